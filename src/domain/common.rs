use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;

    /// Leading characters of the identifier, enough to tell records apart in listings.
    fn short_id(&self) -> String {
        self.id().simple().to_string()[..8].to_string()
    }
}
