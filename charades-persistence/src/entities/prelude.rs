pub use super::saved_states::Entity as SavedStates;
