//! Application configuration.
//!
//! Read from Rocket's figment, so every value can come from `Rocket.toml`
//! or from a `ROCKET_`-prefixed environment variable (for example
//! `ROCKET_ADMIN_PASSWORD` or `ROCKET_WEDDING={groom_name="Sam"}`).

use serde::{Deserialize, Serialize};

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file, or `:memory:`.
    pub database_url: String,
    pub admin_password: String,
    /// Scheme and host prefixed to invitation links, e.g.
    /// `https://wedding.example`. Empty means links stay relative.
    pub public_url: String,
    pub wedding: WeddingDetails,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "data/guests.db".to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            public_url: String::new(),
            wedding: WeddingDetails::default(),
        }
    }
}

impl AppConfig {
    /// Full link for the invitation at `path`.
    #[must_use]
    pub fn invitation_url(&self, path: &str) -> String {
        format!("{}{path}", self.public_url.trim_end_matches('/'))
    }

    #[must_use]
    pub fn uses_default_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

/// Everything the invitation page says about the day itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeddingDetails {
    pub groom_name: String,
    pub bride_name: String,
    pub wedding_date: String,
    pub wedding_date_weekday: String,
    pub banquet_time: String,
    pub ceremony_time: String,
    pub venue: String,
    pub address: String,
    pub cover_subtitle: String,
    pub invite_title: String,
    /// May contain `{wedding_date}` and `{wedding_date_weekday}`.
    pub invite_text: String,
    pub ceremony_invite_text: String,
    pub closing_text: String,
    pub footer_text: String,
    pub rsvp_thank_you: String,
    pub rsvp_regret: String,
}

impl Default for WeddingDetails {
    fn default() -> Self {
        Self {
            groom_name: "Groom".to_string(),
            bride_name: "Bride".to_string(),
            wedding_date: "October 1, 2026".to_string(),
            wedding_date_weekday: "Thursday".to_string(),
            banquet_time: "18:00".to_string(),
            ceremony_time: "16:00".to_string(),
            venue: "The Garden Hall".to_string(),
            address: String::new(),
            cover_subtitle: "WE ARE GETTING MARRIED".to_string(),
            invite_title: "You're Invited".to_string(),
            invite_text: "On {wedding_date} ({wedding_date_weekday})\n\
                          we will be married\n\
                          and would love for you to join us"
                .to_string(),
            ceremony_invite_text: "We would also love you to join our lawn ceremony \
                                   in the afternoon"
                .to_string(),
            closing_text: "Your smiles and blessings are the most precious gift".to_string(),
            footer_text: "Thank you for being part of our story".to_string(),
            rsvp_thank_you: "thank you for coming!".to_string(),
            rsvp_regret: "We're sorry you can't make it, thank you for letting us know.".to_string(),
        }
    }
}

impl WeddingDetails {
    /// `invite_text` with its date placeholders filled in.
    #[must_use]
    pub fn invite_text_rendered(&self) -> String {
        self.invite_text
            .replace("{wedding_date}", &self.wedding_date)
            .replace("{wedding_date_weekday}", &self.wedding_date_weekday)
    }

    /// Confirmation shown to a guest after they reply.
    #[must_use]
    pub fn rsvp_message(&self, is_attending: bool, guest_count: u32) -> String {
        if is_attending {
            format!(
                "{} & {} {}\nYou have confirmed {guest_count} attending.",
                self.groom_name, self.bride_name, self.rsvp_thank_you
            )
        } else {
            self.rsvp_regret.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::figment::providers::Serialized;
    use rocket::figment::Figment;

    #[test]
    fn placeholders_are_filled() {
        let wedding = WeddingDetails {
            invite_text: "See you {wedding_date}, a {wedding_date_weekday}".into(),
            wedding_date: "May 2".into(),
            wedding_date_weekday: "Saturday".into(),
            ..WeddingDetails::default()
        };
        assert_eq!(wedding.invite_text_rendered(), "See you May 2, a Saturday");
    }

    #[test]
    fn rsvp_messages() {
        let wedding = WeddingDetails {
            groom_name: "Sam".into(),
            bride_name: "Alex".into(),
            ..WeddingDetails::default()
        };
        let yes = wedding.rsvp_message(true, 3);
        assert!(yes.starts_with("Sam & Alex"));
        assert!(yes.contains('3'));
        assert_eq!(wedding.rsvp_message(false, 0), wedding.rsvp_regret);
    }

    #[test]
    fn invitation_url_joins_without_double_slash() {
        let config = AppConfig {
            public_url: "https://wedding.example/".into(),
            ..AppConfig::default()
        };
        assert_eq!(config.invitation_url("/i/abc"), "https://wedding.example/i/abc");
        assert_eq!(AppConfig::default().invitation_url("/i/abc"), "/i/abc");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(("admin_password", "s3cret"))
            .merge(("wedding.groom_name", "Sam"))
            .extract()
            .unwrap();

        assert_eq!(config.admin_password, "s3cret");
        assert!(!config.uses_default_password());
        assert_eq!(config.wedding.groom_name, "Sam");
        assert_eq!(config.wedding.bride_name, "Bride");
        assert_eq!(config.database_url, "data/guests.db");
    }
}
