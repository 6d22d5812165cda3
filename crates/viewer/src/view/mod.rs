//! Card view composition.
//!
//! A [`FetchState`] plus the viewer's options map to exactly one
//! [`CardView`]; each variant renders through its own text template.

mod palette;

use std::fmt;
use std::str::FromStr;

use askama::Template;
use bizcard_core::display::{
    FALLBACK_BIRTH_DATE, FALLBACK_CITY, FALLBACK_ORGANIZATION, FALLBACK_TITLE,
    LINKEDIN_UNAVAILABLE, PHOTO_UNAVAILABLE, PLACEHOLDER, display_value,
    format_membership_date,
};
use bizcard_core::{FetchState, ThemePreference, UserRecord};

pub use palette::Palette;

use crate::assets::Logo;
use crate::config::OrganizationProfile;

/// Shown when the record does not exist.
pub const NOT_FOUND_MESSAGE: &str = "Usuario no encontrado";

/// Shown for every other failure.
pub const LOAD_FAILURE_MESSAGE: &str = "Error al cargar la información";

/// Which side of the card is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    /// The other side.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

/// Panel shown on the front face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Contact,
    Company,
    Socials,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Self; 3] = [Self::Contact, Self::Company, Self::Socials];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Company => "company",
            Self::Socials => "socials",
        }
    }

    /// Label on the tab bar.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Contact => "Contacto",
            Self::Company => "Empresa",
            Self::Socials => "Redes",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tab '{s}' (expected contact, company or socials)"))
    }
}

/// Everything besides the fetch state that shapes the view.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub face: Face,
    pub tab: Tab,
    pub theme: ThemePreference,
    pub palette: Palette,
    pub organization: OrganizationProfile,
    pub logo: Logo,
}

/// One tab on the tab bar.
#[derive(Debug, Clone)]
pub struct TabLabel {
    pub label: &'static str,
    pub active: bool,
}

/// Skeleton shown while a lookup is in flight.
#[derive(Debug, Clone, Template)]
#[template(path = "loading.txt")]
pub struct LoadingTemplate {
    pub palette: Palette,
}

/// Front face with the selected panel.
#[derive(Debug, Clone, Template)]
#[template(path = "front.txt")]
pub struct FrontTemplate {
    pub palette: Palette,
    pub theme: &'static str,
    pub tab: Tab,
    pub tabs: Vec<TabLabel>,
    pub name: String,
    pub title: String,
    pub birth_date: String,
    pub avatar: String,
    pub organization: String,
    pub member_since: String,
    pub linkedin: String,
    pub has_linkedin: bool,
    pub can_add_contact: bool,
}

/// Back face with organization details.
#[derive(Debug, Clone, Template)]
#[template(path = "back.txt")]
pub struct BackTemplate {
    pub palette: Palette,
    pub theme: &'static str,
    pub logo: Vec<String>,
    pub organization: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub city: String,
}

/// Terminal page for a lookup that did not produce a record.
#[derive(Debug, Clone, Template)]
#[template(path = "not_found.txt")]
pub struct NotFoundTemplate {
    pub palette: Palette,
    pub message: &'static str,
}

/// The view for one fetch state.
#[derive(Debug, Clone)]
pub enum CardView {
    Loading(LoadingTemplate),
    Front(Box<FrontTemplate>),
    Back(Box<BackTemplate>),
    NotFound(NotFoundTemplate),
}

impl CardView {
    /// Pick and fill the view for `state`.
    #[must_use]
    pub fn build(state: &FetchState, options: &ViewOptions) -> Self {
        let palette = options.palette;
        match state {
            FetchState::Loading => Self::Loading(LoadingTemplate { palette }),
            FetchState::Ready(record) => match options.face {
                Face::Front => Self::Front(Box::new(front(record, options))),
                Face::Back => Self::Back(Box::new(back(record, options))),
            },
            FetchState::NotFound => Self::NotFound(NotFoundTemplate {
                palette,
                message: NOT_FOUND_MESSAGE,
            }),
            FetchState::Failed(_) => Self::NotFound(NotFoundTemplate {
                palette,
                message: LOAD_FAILURE_MESSAGE,
            }),
        }
    }

    /// Render to terminal text.
    ///
    /// # Errors
    ///
    /// Returns error if template rendering fails.
    pub fn render(&self) -> Result<String, askama::Error> {
        match self {
            Self::Loading(t) => t.render(),
            Self::Front(t) => t.render(),
            Self::Back(t) => t.render(),
            Self::NotFound(t) => t.render(),
        }
    }
}

/// Build and render the view for `state`.
///
/// # Errors
///
/// Returns error if template rendering fails.
pub fn render(state: &FetchState, options: &ViewOptions) -> Result<String, askama::Error> {
    CardView::build(state, options).render()
}

fn front(record: &UserRecord, options: &ViewOptions) -> FrontTemplate {
    let linkedin = record.valid_linkedin_url();

    FrontTemplate {
        palette: options.palette,
        theme: options.theme.label(),
        tab: options.tab,
        tabs: Tab::ALL
            .into_iter()
            .map(|tab| TabLabel {
                label: tab.label(),
                active: tab == options.tab,
            })
            .collect(),
        name: record
            .display_name()
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        title: display_value(record.title(), FALLBACK_TITLE),
        birth_date: display_value(record.birth_date(), FALLBACK_BIRTH_DATE),
        avatar: display_value(record.valid_photo_url(), PHOTO_UNAVAILABLE),
        organization: display_value(record.organization(), FALLBACK_ORGANIZATION),
        member_since: format_membership_date(record.created_at()),
        linkedin: display_value(linkedin, LINKEDIN_UNAVAILABLE),
        has_linkedin: linkedin.is_some(),
        can_add_contact: record.phone_number().is_some(),
    }
}

fn back(record: &UserRecord, options: &ViewOptions) -> BackTemplate {
    let org = &options.organization;

    BackTemplate {
        palette: options.palette,
        theme: options.theme.label(),
        logo: options.logo.lines().into_iter().map(str::to_string).collect(),
        organization: display_value(record.organization(), &org.name),
        tagline: org.tagline.clone(),
        email: display_value(record.email(), &org.email),
        phone: display_value(record.phone_number(), &org.phone),
        website: display_value(record.website_url(), &org.website),
        city: display_value(record.city(), FALLBACK_CITY),
    }
}
