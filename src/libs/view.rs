use super::config::HostConfig;
use super::focus::FocusTarget;
use super::nudge::NudgeKind;
use super::settings::NudgeSettings;
use super::sound::SoundKey;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn settings(settings: &NudgeSettings) {
        let mut table = Table::new();

        table.add_row(row!["NUDGE", "DELAY (S)", "SOUND"]);
        for kind in NudgeKind::ALL {
            table.add_row(row![kind, settings.seconds(kind), settings.sound(kind).as_str()]);
        }
        table.printstd();
    }

    pub fn host_config(config: &HostConfig) {
        let mut table = Table::new();

        table.add_row(row!["CALL TIMEOUT (MS)", "PLAYBACK DELAY (MS)"]);
        table.add_row(row![config.call_timeout_ms, config.playback_delay_ms]);
        table.printstd();
    }

    pub fn sounds() {
        let mut table = Table::new();

        table.add_row(row!["KEY", "FILE", "DEFAULT FOR"]);
        for sound in SoundKey::ALL {
            let defaults: Vec<String> = NudgeKind::ALL
                .into_iter()
                .filter(|kind| SoundKey::default_for(*kind) == sound)
                .map(|kind| kind.to_string())
                .collect();
            table.add_row(row![sound.as_str(), sound.path().unwrap_or("-"), defaults.join(", ")]);
        }
        table.printstd();
    }

    pub fn focus_target(target: &FocusTarget) {
        let mut table = Table::new();

        table.add_row(row!["TAB ID", "URL"]);
        table.add_row(row![target.tab_id, target.url]);
        table.printstd();
    }
}
