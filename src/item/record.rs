use serde::de::DeserializeOwned;
use serde::Serialize;

/// Uniform access to the fields every stored portfolio record shares.
///
/// The collection layer owns `id`, `order` and the timestamps: concrete
/// record types expose them only through this trait, and nothing outside
/// the service layer mutates them directly.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name in the backing document store.
    const COLLECTION: &'static str;

    /// Human-readable kind name used in error messages.
    const KIND: &'static str;

    /// Store-assigned identity; `None` on a not-yet-persisted draft.
    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: String);

    /// Display position; missing on legacy records, which sort last.
    fn order(&self) -> Option<u32>;
    fn set_order(&mut self, order: u32);

    fn set_created_at(&mut self, ts: String);
    fn set_updated_at(&mut self, ts: String);

    /// Check the kind's required display fields.
    ///
    /// Returns a human-readable message naming the missing field.
    fn validate(&self) -> Result<(), String>;
}
