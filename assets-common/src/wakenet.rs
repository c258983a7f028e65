//! WakeNet model catalog
//!
//! Static list of the wake-word models published in the ESP-SR
//! `wakenet_model` share, and which of them a given chip can run.
//!
//! - WakeNet9 (`wn9_*`): chips with PSRAM and vector extensions
//! - WakeNet9s (`wn9s_*`): the small variant for ESP32-C3 / ESP32-C6

/// Files every WakeNet model directory contains, in fetch order
pub const SHARE_MODEL_FILES: &[&str] = &["_MODEL_INFO_", "wn9_data", "wn9_index"];

/// Default location of the model share, relative to the working directory
pub const DEFAULT_SHARE_LOCATION: &str = "static/wakenet_model";

/// Chips restricted to WakeNet9s models
const SMALL_MODEL_CHIPS: &[&str] = &["esp32c3", "esp32c6"];

const WAKENET9_MODELS: &[&str] = &[
    "wn9_alexa",
    "wn9_astrolabe_tts",
    "wn9_bluechip_tts2",
    "wn9_computer_tts",
    "wn9_haixiaowu_tts",
    "wn9_heyily_tts2",
    "wn9_heyprinter_tts",
    "wn9_heywanda_tts",
    "wn9_heywillow_tts",
    "wn9_hiesp",
    "wn9_hifairy_tts2",
    "wn9_hijason_tts2",
    "wn9_hijolly_tts2",
    "wn9_hijoy_tts",
    "wn9_hilexin",
    "wn9_hilili_tts",
    "wn9_himfive",
    "wn9_himiaomiao_tts",
    "wn9_hitelly_tts",
    "wn9_hiwalle_tts2",
    "wn9_hixiaoxing_tts",
    "wn9_jarvis_tts",
    "wn9_linaiban_tts2",
    "wn9_miaomiaotongxue_tts",
    "wn9_mycroft_tts",
    "wn9_nihaobaiying_tts2",
    "wn9_nihaodongdong_tts2",
    "wn9_nihaomiaoban_tts2",
    "wn9_nihaoxiaoan_tts2",
    "wn9_nihaoxiaoxin_tts",
    "wn9_nihaoxiaoyi_tts2",
    "wn9_nihaoxiaozhi",
    "wn9_nihaoxiaozhi_tts",
    "wn9_sophia_tts",
    "wn9_xiaoaitongxue",
    "wn9_xiaobinxiaobin_tts",
    "wn9_xiaojianxiaojian_tts2",
    "wn9_xiaokangtongxue_tts2",
    "wn9_xiaolongxiaolong_tts",
    "wn9_xiaoluxiaolu_tts2",
    "wn9_xiaomeitongxue_tts",
    "wn9_xiaomingtongxue_tts2",
    "wn9_xiaosurou_tts2",
    "wn9_xiaotexiaote_tts2",
    "wn9_xiaoyaxiaoya_tts2",
    "wn9_xiaoyutongxue_tts2",
];

const WAKENET9S_MODELS: &[&str] = &[
    "wn9s_alexa",
    "wn9s_hiesp",
    "wn9s_hijason",
    "wn9s_hilexin",
    "wn9s_nihaoxiaozhi",
];

/// Model family a chip can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WakeNetTier {
    WakeNet9,
    WakeNet9s,
}

impl WakeNetTier {
    /// Tier for a chip identifier such as `esp32s3` or `esp32c3`
    pub fn for_chip(chip: &str) -> Self {
        if SMALL_MODEL_CHIPS.iter().any(|&small| small == chip) {
            WakeNetTier::WakeNet9s
        } else {
            WakeNetTier::WakeNet9
        }
    }

    /// Name prefix every model of this tier carries
    pub fn prefix(self) -> &'static str {
        match self {
            WakeNetTier::WakeNet9 => "wn9_",
            WakeNetTier::WakeNet9s => "wn9s_",
        }
    }

    /// Display name ("WakeNet9" / "WakeNet9s")
    pub fn name(self) -> &'static str {
        match self {
            WakeNetTier::WakeNet9 => "WakeNet9",
            WakeNetTier::WakeNet9s => "WakeNet9s",
        }
    }

    /// Known models of this tier
    pub fn models(self) -> &'static [&'static str] {
        match self {
            WakeNetTier::WakeNet9 => WAKENET9_MODELS,
            WakeNetTier::WakeNet9s => WAKENET9S_MODELS,
        }
    }
}

/// Known models of both tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCatalog {
    pub wakenet9: &'static [&'static str],
    pub wakenet9s: &'static [&'static str],
}

impl ModelCatalog {
    pub fn available() -> Self {
        Self {
            wakenet9: WAKENET9_MODELS,
            wakenet9s: WAKENET9S_MODELS,
        }
    }

    /// (tier, models) pairs in display order
    pub fn tiers(&self) -> [(WakeNetTier, &'static [&'static str]); 2] {
        [
            (WakeNetTier::WakeNet9, self.wakenet9),
            (WakeNetTier::WakeNet9s, self.wakenet9s),
        ]
    }
}

/// Whether `model` can be used on `chip`.
///
/// Only the name prefix is checked; the model does not have to be in the
/// catalog.
pub fn is_valid_model(model: &str, chip: &str) -> bool {
    model.starts_with(WakeNetTier::for_chip(chip).prefix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_chips_need_wn9s() {
        assert!(is_valid_model("wn9s_hilexin", "esp32c3"));
        assert!(is_valid_model("wn9s_alexa", "esp32c6"));
        assert!(!is_valid_model("wn9_alexa", "esp32c3"));
        assert!(!is_valid_model("alexa", "esp32c6"));
    }

    #[test]
    fn test_other_chips_need_wn9() {
        assert!(is_valid_model("wn9_nihaoxiaozhi_tts", "esp32s3"));
        assert!(is_valid_model("wn9_custom", "esp32p4"));
        assert!(!is_valid_model("wn9s_hilexin", "esp32s3"));
        assert!(!is_valid_model("WN9_alexa", "esp32s3"));
    }

    #[test]
    fn test_chip_match_is_exact() {
        assert_eq!(WakeNetTier::for_chip("ESP32C3"), WakeNetTier::WakeNet9);
        assert_eq!(WakeNetTier::for_chip("esp32c3"), WakeNetTier::WakeNet9s);
    }

    #[test]
    fn test_catalog_prefixes() {
        let catalog = ModelCatalog::available();
        assert_eq!(catalog.wakenet9.len(), 46);
        assert_eq!(catalog.wakenet9s.len(), 5);
        for (tier, models) in catalog.tiers() {
            assert_eq!(tier.models(), models);
            assert!(models.iter().all(|m| m.starts_with(tier.prefix())));
        }
    }
}
