mod common;

#[cfg(test)]
mod tests {
    use super::common::MemoryStore;
    use drift::libs::nudge::{NudgeKind, MAX_DELAY_SECS};
    use drift::libs::settings::{
        mirrored_target, validate_seconds, wizard_minimum, JsonSettingsStore, NudgeSettings, SettingsStore, FOCUS_TAB_ID_KEY,
        FOCUS_TAB_URL_KEY,
    };
    use drift::libs::sound::{resolve_choice, resolve_sound, SoundKey};
    use serde_json::{json, Map, Value};
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct StoreTestContext {
        _temp_dir: TempDir,
        store: JsonSettingsStore,
    }

    impl AsyncTestContext for StoreTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let store = JsonSettingsStore::new(temp_dir.path().join("settings.json"));
            StoreTestContext { _temp_dir: temp_dir, store }
        }
    }

    fn entries(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs.iter().map(|(key, value)| (key.to_string(), value.clone())).collect()
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_missing_file_reads_as_empty(ctx: &mut StoreTestContext) {
        assert!(ctx.store.load().await.unwrap().is_empty());
        assert_eq!(ctx.store.get("totalDriftSeconds").await.unwrap(), None);
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_set_merges_and_remove_deletes(ctx: &mut StoreTestContext) {
        ctx.store.set(entries(&[("totalDriftSeconds", json!(20)), (FOCUS_TAB_ID_KEY, json!(5))])).await.unwrap();
        ctx.store.set(entries(&[(FOCUS_TAB_URL_KEY, json!("https://a.example"))])).await.unwrap();

        assert_eq!(ctx.store.get("totalDriftSeconds").await.unwrap(), Some(json!(20)));
        assert_eq!(ctx.store.load().await.unwrap().len(), 3);

        ctx.store.remove(&[FOCUS_TAB_ID_KEY, FOCUS_TAB_URL_KEY]).await.unwrap();
        ctx.store.remove(&[FOCUS_TAB_ID_KEY, FOCUS_TAB_URL_KEY]).await.unwrap();

        let map = ctx.store.load().await.unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("totalDriftSeconds"));
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_external_edits_are_picked_up(ctx: &mut StoreTestContext) {
        ctx.store.set(entries(&[("totalIdleSeconds", json!(30))])).await.unwrap();
        std::fs::write(ctx.store.path(), r#"{"totalIdleSeconds": 90}"#).unwrap();

        let delay = NudgeKind::IdleReturn.resolve_delay(&ctx.store).await;
        assert_eq!(delay, Duration::from_secs(90));
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_corrupt_file_falls_back_to_default_delay(ctx: &mut StoreTestContext) {
        std::fs::write(ctx.store.path(), "{ not json").unwrap();

        assert!(ctx.store.get("totalDriftSeconds").await.is_err());
        assert_eq!(NudgeKind::TabDrift.resolve_delay(&ctx.store).await, Duration::from_secs(10));
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_clear_removes_file(ctx: &mut StoreTestContext) {
        ctx.store.set(entries(&[("totalDriftSeconds", json!(20))])).await.unwrap();

        ctx.store.clear().await.unwrap();
        ctx.store.clear().await.unwrap();

        assert!(!ctx.store.path().exists());
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_mirrored_target(ctx: &mut StoreTestContext) {
        assert_eq!(mirrored_target(&ctx.store).await.unwrap(), None);

        ctx.store.set(entries(&[(FOCUS_TAB_ID_KEY, json!(12))])).await.unwrap();
        assert_eq!(mirrored_target(&ctx.store).await.unwrap(), None);

        ctx.store.set(entries(&[(FOCUS_TAB_URL_KEY, json!("https://a.example"))])).await.unwrap();
        let target = mirrored_target(&ctx.store).await.unwrap().unwrap();
        assert_eq!(target.tab_id, 12);
        assert_eq!(target.url, "https://a.example");
    }

    #[test]
    fn test_delay_policy_accepts_valid_values() {
        let drift = NudgeKind::TabDrift.delay_policy();
        assert_eq!(drift.resolve(Some(&json!(1))), Duration::from_secs(1));
        assert_eq!(drift.resolve(Some(&json!(2.5))), Duration::from_millis(2500));

        let idle = NudgeKind::IdleReturn.delay_policy();
        assert_eq!(idle.resolve(Some(&json!(15))), Duration::from_secs(15));
        assert_eq!(idle.resolve(Some(&json!(3600))), Duration::from_secs(3600));
    }

    #[test]
    fn test_delay_policy_rejects_invalid_values() {
        for kind in NudgeKind::ALL {
            let policy = kind.delay_policy();
            let default = Duration::from_secs_f64(policy.default_secs);
            for stored in [json!(0), json!(-5), json!(policy.floor_secs - 0.1), json!("20"), json!(true), json!(null), json!([20])] {
                assert_eq!(policy.resolve(Some(&stored)), default, "{} with {}", kind, stored);
            }
            assert_eq!(policy.resolve(None), default);
        }
    }

    #[test]
    fn test_idle_floor_is_fifteen_seconds() {
        let idle = NudgeKind::IdleReturn.delay_policy();
        assert_eq!(idle.resolve(Some(&json!(14))), Duration::from_secs(60));
        assert_eq!(idle.resolve(Some(&json!(10))), Duration::from_secs(60));
    }

    #[test]
    fn test_delay_policy_rejects_huge_values() {
        for kind in NudgeKind::ALL {
            let policy = kind.delay_policy();
            for stored in [json!(1e15), json!(1e19), json!(1e20), json!(f64::MAX), json!(u64::MAX), json!(MAX_DELAY_SECS + 1.0)] {
                assert_eq!(policy.resolve(Some(&stored)), policy.default_delay(), "{} with {}", kind, stored);
            }
        }

        let drift = NudgeKind::TabDrift.delay_policy();
        assert_eq!(drift.resolve(Some(&json!(MAX_DELAY_SECS))), Duration::from_secs(86_400));
    }

    #[tokio::test]
    async fn test_huge_stored_delay_resolves_to_default() {
        let store = MemoryStore::with(&[("totalDriftSeconds", json!(1e20)), ("totalIdleSeconds", json!(1e19))]);

        assert_eq!(NudgeKind::TabDrift.resolve_delay(&store).await, Duration::from_secs(10));
        assert_eq!(NudgeKind::IdleReturn.resolve_delay(&store).await, Duration::from_secs(60));

        let mut map = Map::new();
        map.insert("totalVideoPauseSeconds".to_string(), json!(1e20));
        assert_eq!(NudgeSettings::from_map(&map).video_pause_seconds, 10);
    }

    #[test]
    fn test_wizard_floors() {
        assert_eq!(wizard_minimum(NudgeKind::TabDrift), 5);
        assert_eq!(wizard_minimum(NudgeKind::VideoPause), 5);
        assert_eq!(wizard_minimum(NudgeKind::IdleReturn), 15);

        assert!(validate_seconds(NudgeKind::TabDrift, 4).is_err());
        assert!(validate_seconds(NudgeKind::TabDrift, 5).is_ok());
        assert!(validate_seconds(NudgeKind::IdleReturn, 14).is_err());
        assert!(validate_seconds(NudgeKind::IdleReturn, 15).is_ok());
        assert_eq!(validate_seconds(NudgeKind::VideoPause, 1).unwrap_err(), "Must be at least 5 seconds");

        assert!(validate_seconds(NudgeKind::IdleReturn, 86_400).is_ok());
        assert_eq!(validate_seconds(NudgeKind::IdleReturn, 86_401).unwrap_err(), "Must be at most 86400 seconds");
    }

    #[test]
    fn test_sound_choice_resolution() {
        assert_eq!(resolve_choice(NudgeKind::TabDrift, None), Some(SoundKey::Nudge1));
        assert_eq!(resolve_choice(NudgeKind::VideoPause, None), Some(SoundKey::QuietNudge4));
        assert_eq!(resolve_choice(NudgeKind::IdleReturn, None), Some(SoundKey::Nudge2));

        assert_eq!(resolve_choice(NudgeKind::TabDrift, Some(&json!(""))), Some(SoundKey::Nudge1));
        assert_eq!(resolve_choice(NudgeKind::TabDrift, Some(&json!(3))), Some(SoundKey::Nudge1));
        assert_eq!(resolve_choice(NudgeKind::TabDrift, Some(&json!("whistleNudge5"))), Some(SoundKey::WhistleNudge5));
        assert_eq!(resolve_choice(NudgeKind::TabDrift, Some(&json!("none"))), Some(SoundKey::None));
        assert_eq!(resolve_choice(NudgeKind::TabDrift, Some(&json!("airhorn"))), None);
    }

    #[test]
    fn test_sound_catalog() {
        assert_eq!(SoundKey::None.path(), None);
        assert_eq!(SoundKey::QuietNudge4.path(), Some("sounds/quiet_nudge4.wav"));
        assert_eq!("nudge3".parse::<SoundKey>().unwrap(), SoundKey::Nudge3);
        assert!("Nudge3".parse::<SoundKey>().is_err());
        for sound in SoundKey::ALL {
            assert_eq!(sound.as_str().parse::<SoundKey>().unwrap(), sound);
        }
    }

    #[tokio::test]
    async fn test_resolve_sound() {
        let store = MemoryStore::with(&[("idleNudgeSoundChoice", json!("nudge3")), ("videoPauseSoundChoice", json!("bogus"))]);

        assert_eq!(resolve_sound(&store, NudgeKind::TabDrift).await, Some("sounds/nudge1.wav"));
        assert_eq!(resolve_sound(&store, NudgeKind::IdleReturn).await, Some("sounds/nudge3.wav"));
        assert_eq!(resolve_sound(&store, NudgeKind::VideoPause).await, None);
    }

    #[test]
    fn test_nudge_settings_view() {
        let defaults = NudgeSettings::from_map(&Map::new());
        assert_eq!(defaults, NudgeSettings::default());
        assert_eq!(defaults.seconds(NudgeKind::IdleReturn), 60);
        assert_eq!(defaults.sound(NudgeKind::VideoPause), SoundKey::QuietNudge4);

        let mut edited = defaults.clone();
        edited.set_seconds(NudgeKind::TabDrift, 45);
        edited.set_sound(NudgeKind::IdleReturn, SoundKey::None);

        let map = edited.to_entries();
        assert_eq!(map.get("totalDriftSeconds"), Some(&json!(45)));
        assert_eq!(map.get("idleNudgeSoundChoice"), Some(&json!("none")));
        assert_eq!(NudgeSettings::from_map(&map), edited);
    }

    #[test]
    fn test_nudge_kind_names() {
        assert_eq!(NudgeKind::IdleReturn.to_string(), "idleNudge");
        assert_eq!("tabDrift".parse::<NudgeKind>().unwrap(), NudgeKind::TabDrift);
        assert_eq!("video-pause".parse::<NudgeKind>().unwrap(), NudgeKind::VideoPause);
        assert!("break".parse::<NudgeKind>().is_err());
        assert_eq!(serde_json::to_value(NudgeKind::IdleReturn).unwrap(), json!("idleNudge"));
        assert_eq!(NudgeKind::from_notification_id("idleNotification"), Some(NudgeKind::IdleReturn));
        assert_eq!(NudgeKind::from_notification_id("other"), None);
    }
}
