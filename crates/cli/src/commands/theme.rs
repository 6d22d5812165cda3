//! Theme preference commands.

use std::io::{self, Write};
use std::path::Path;

use bizcard_core::ThemePreference;
use bizcard_viewer::error::{Result, add_breadcrumb};
use bizcard_viewer::preferences::PreferenceStore;

/// What to do with the stored theme.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    Show,
    Toggle,
    Set(ThemePreference),
}

/// Apply `action` to the preference file and print the resulting theme.
pub fn run(path: Option<&Path>, action: Action) -> Result<()> {
    let store = PreferenceStore::at_default_location(path)?;

    let theme = match action {
        Action::Show => store.load_theme(),
        Action::Toggle => {
            let theme = store.toggle_theme()?;
            add_breadcrumb("theme", "Toggled theme", Some(&[("theme", theme.label())]));
            theme
        }
        Action::Set(theme) => {
            store.save_theme(theme)?;
            add_breadcrumb("theme", "Set theme", Some(&[("theme", theme.label())]));
            theme
        }
    };

    writeln!(io::stdout(), "{}", theme.label())?;
    Ok(())
}
