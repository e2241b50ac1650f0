use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use pulseguard_core::advisory::AdvisoryTemplate;
use pulseguard_core::types::Bpm;
use pulseguard_core::UserProfile;

#[derive(Clone, Debug, Parser)]
#[command(name = "pulseguard", version, about, verbatim_doc_comment)]
///
/// PulseGuard
///
/// Records pulse readings and raises an SOS with location and advice when a
/// reading is dangerously high.
///
pub struct Args {
    /// Path to the JSON profile store. Overrides PULSEGUARD_STORE_PATH.
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    /// High-pulse threshold in BPM. Overrides HIGH_PULSE_THRESHOLD.
    #[arg(short, long, global = true)]
    pub threshold: Option<Bpm>,

    /// Log output format.
    #[arg(short = 'f', long, value_enum, default_value_t = LogFormat::Pretty, env = "PULSEGUARD_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Record a pulse reading, raising an SOS if it is above the threshold.
    Submit {
        /// Pulse rate in beats per minute.
        bpm: String,
    },
    /// Raise an SOS manually.
    Sos,
    /// Show the last reading and whether it is high.
    Status,
    /// Show or edit the user profile.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Ask for advice from one of the built-in templates.
    Advise {
        /// Template key, e.g. SAFETY_TIPS or pulse-info.
        template: String,
        /// Pulse value for the HIGH_PULSE template.
        #[arg(long)]
        bpm: Option<Bpm>,
    },
    /// Ask the safety assistant a question.
    Chat {
        message: String,
    },
}

#[derive(Clone, Debug, Subcommand)]
pub enum ProfileCommand {
    Show,
    Set(ProfileArgs),
}

/// Profile fields to change. Omitted fields keep their stored value; an
/// empty value clears the field.
#[derive(Clone, Debug, Default, ClapArgs)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    #[arg(long)]
    pub contact_name: Option<String>,
    #[arg(long)]
    pub contact_number: Option<String>,
    #[arg(long)]
    pub health_notes: Option<String>,
}

impl ProfileArgs {
    /// Merge the given flags over `profile`.
    pub fn apply(self, mut profile: UserProfile) -> UserProfile {
        fn merge(slot: &mut Option<String>, value: Option<String>) {
            if let Some(value) = value {
                let value = value.trim().to_string();
                *slot = (!value.is_empty()).then_some(value);
            }
        }

        merge(&mut profile.name, self.name);
        merge(&mut profile.age, self.age);
        merge(&mut profile.emergency_contact_name, self.contact_name);
        merge(&mut profile.emergency_contact_number, self.contact_number);
        merge(&mut profile.health_notes, self.health_notes);
        profile
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.contact_name.is_none()
            && self.contact_number.is_none()
            && self.health_notes.is_none()
    }
}

/// Resolve the `advise` arguments to a template.
pub fn resolve_template(key: &str, bpm: Option<Bpm>) -> Result<AdvisoryTemplate, String> {
    let normalized = key.to_ascii_uppercase().replace('-', "_");
    if normalized == "HIGH_PULSE" {
        return bpm
            .map(|bpm| AdvisoryTemplate::HighPulse { bpm })
            .ok_or_else(|| "HIGH_PULSE needs --bpm".to_string());
    }
    AdvisoryTemplate::from_key(&normalized).ok_or_else(|| format!("unknown template '{key}'"))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_submit_with_global_flags() {
        let args =
            Args::try_parse_from(["pulseguard", "submit", "130", "--threshold", "110"]).unwrap();
        assert_eq!(args.threshold, Some(110));
        assert_eq!(args.log_format, LogFormat::Pretty);
        assert_matches!(args.command, Command::Submit { ref bpm } if bpm == "130");
    }

    #[test]
    fn submit_keeps_raw_text_for_validation() {
        let args = Args::try_parse_from(["pulseguard", "submit", "fast"]).unwrap();
        assert_matches!(args.command, Command::Submit { ref bpm } if bpm == "fast");
    }

    #[test]
    fn parses_profile_set() {
        let args = Args::try_parse_from([
            "pulseguard",
            "profile",
            "set",
            "--name",
            "Amara",
            "--contact-number",
            "+2348000000000",
        ])
        .unwrap();
        let Command::Profile(ProfileCommand::Set(fields)) = args.command else {
            panic!("expected profile set");
        };
        assert_eq!(fields.name.as_deref(), Some("Amara"));
        assert_eq!(fields.contact_number.as_deref(), Some("+2348000000000"));
        assert_eq!(fields.age, None);
    }

    #[test]
    fn parses_json_log_format() {
        let args = Args::try_parse_from(["pulseguard", "--log-format", "json", "sos"]).unwrap();
        assert_eq!(args.log_format, LogFormat::Json);
        assert_matches!(args.command, Command::Sos);
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Args::try_parse_from(["pulseguard"]).is_err());
    }

    #[test]
    fn profile_flags_merge_over_stored_values() {
        let stored = UserProfile {
            name: Some("Amara".into()),
            age: Some("29".into()),
            ..Default::default()
        };
        let updated = ProfileArgs {
            age: Some("".into()),
            contact_number: Some(" +15550100 ".into()),
            ..Default::default()
        }
        .apply(stored);

        assert_eq!(updated.name.as_deref(), Some("Amara"));
        assert_eq!(updated.age, None);
        assert_eq!(updated.emergency_contact_number.as_deref(), Some("+15550100"));
    }

    #[test]
    fn resolves_templates() {
        assert_eq!(
            resolve_template("safety-tips", None),
            Ok(AdvisoryTemplate::SafetyTips)
        );
        assert_eq!(
            resolve_template("HIGH_PULSE", Some(140)),
            Ok(AdvisoryTemplate::HighPulse { bpm: 140 })
        );
        assert!(resolve_template("high-pulse", None).is_err());
        assert!(resolve_template("horoscope", None).is_err());
    }
}
