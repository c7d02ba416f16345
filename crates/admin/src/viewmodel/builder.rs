//! Page builder dialogs.
//!
//! Both dialogs collect content edits but have nowhere to send them: saving
//! reports that nothing was stored.

use crate::notify::{Notice, Notifications};

/// One input in a builder dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub multiline: bool,
}

impl FieldSpec {
    const fn line(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            key,
            label,
            placeholder,
            multiline: false,
        }
    }

    const fn text(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            key,
            label,
            placeholder,
            multiline: true,
        }
    }
}

const HOME_PAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::line("hero-title", "Hero title", "Enter a title"),
    FieldSpec::text("hero-desc", "Hero description", "Enter a description"),
    FieldSpec::line("cta-text", "Button text", "e.g. Get started"),
];

const SITE_SETTINGS_FIELDS: &[FieldSpec] = &[
    FieldSpec::line("site-title", "Site title", "My site"),
    FieldSpec::text("meta-desc", "Meta description", "Description for search engines"),
    FieldSpec::line("keywords", "Keywords", "word1, word2, word3"),
];

/// The two content-editing dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderDialog {
    HomePage,
    SiteSettings,
}

impl BuilderDialog {
    pub const ALL: [Self; 2] = [Self::HomePage, Self::SiteSettings];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HomePage => "home",
            Self::SiteSettings => "settings",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::HomePage => "Home page",
            Self::SiteSettings => "Site settings",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::HomePage => "Edit the hero block, sections and copy",
            Self::SiteSettings => "SEO, meta tags and basic configuration",
        }
    }

    #[must_use]
    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::HomePage => HOME_PAGE_FIELDS,
            Self::SiteSettings => SITE_SETTINGS_FIELDS,
        }
    }

    #[must_use]
    pub const fn save_label(self) -> &'static str {
        match self {
            Self::HomePage => "Save changes",
            Self::SiteSettings => "Save settings",
        }
    }
}

impl std::str::FromStr for BuilderDialog {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("invalid dialog: {s} (expected home or settings)"))
    }
}

/// Values typed into an open dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderDraft {
    dialog: BuilderDialog,
    values: Vec<String>,
}

impl BuilderDraft {
    #[must_use]
    pub fn new(dialog: BuilderDialog) -> Self {
        Self {
            dialog,
            values: vec![String::new(); dialog.fields().len()],
        }
    }

    #[must_use]
    pub const fn dialog(&self) -> BuilderDialog {
        self.dialog
    }

    /// Set the field named `key`. Returns false for keys the dialog lacks.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let Some(index) = self.dialog.fields().iter().position(|f| f.key == key) else {
            return false;
        };
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value.into();
        }
        true
    }

    /// Current value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let index = self.dialog.fields().iter().position(|f| f.key == key)?;
        self.values.get(index).map(String::as_str)
    }

    /// Fields paired with their current values.
    pub fn entries(&self) -> impl Iterator<Item = (&FieldSpec, &str)> {
        self.dialog
            .fields()
            .iter()
            .zip(self.values.iter().map(String::as_str))
    }

    /// Press the save button.
    ///
    /// There is no content service, so this only tells the operator so.
    pub fn save(&self, notices: &mut Notifications) {
        let edited = self.values.iter().filter(|v| !v.trim().is_empty()).count();
        tracing::info!(dialog = self.dialog.as_str(), edited, "Builder draft discarded");
        notices.push(Notice::success(
            "Preview only",
            format!(
                "{}: {edited} field(s) edited, nothing was stored",
                self.dialog.title()
            ),
        ));
    }
}
