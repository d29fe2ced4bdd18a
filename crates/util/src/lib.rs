pub mod paths;
pub mod preferences;
pub mod text;

pub use paths::expand_tilde;
pub use preferences::{PreferencesError, UserPreferences};
pub use text::truncate_with_ellipsis;
