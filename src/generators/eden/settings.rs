//! Typed `qt-config.ini` sections
//!
//! Each value is written as `key` plus a `key\default` companion telling the
//! emulator whether the value is its own default. Values taken from the
//! frontend options get `false`, defaulted ones `true`, except where a
//! section documents otherwise.

use crate::config::Options;
use crate::ini::IniDocument;

/// A setting value and whether it is the emulator default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub value: String,
    pub is_default: bool,
}

impl Setting {
    /// Take `option` when set, else `default`
    pub fn from_option(options: &Options, option: &str, default: &str) -> Self {
        match options.get(option) {
            Some(value) => Self { value: value.to_string(), is_default: false },
            None => Self { value: default.to_string(), is_default: true },
        }
    }

    fn fixed(value: &str, is_default: bool) -> Self {
        Self { value: value.to_string(), is_default }
    }

    fn default_flag(&self) -> &'static str {
        if self.is_default {
            "true"
        } else {
            "false"
        }
    }

    fn write(&self, doc: &mut IniDocument, section: &str, key: &str) {
        doc.set(section, key, self.value.clone());
        doc.set(section, &format!("{}\\default", key), self.default_flag());
    }
}

/// `[UI]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiSettings {
    pub enable_discord_presence: Setting,
    pub language: Setting,
    pub single_window_mode: Setting,
    pub select_user_on_boot: Setting,
}

impl UiSettings {
    const SECTION: &'static str = "UI";

    pub fn from_options(options: &Options) -> Self {
        Self {
            enable_discord_presence: Setting::fixed(
                options.get_or("yuzu_enable_discord_presence", "false"),
                false,
            ),
            language: Setting::from_option(options, "yuzu_intlanguage", "en"),
            single_window_mode: Setting::from_option(options, "single_window", "true"),
            select_user_on_boot: Setting::from_option(options, "user_profile", "true"),
        }
    }

    fn write(&self, doc: &mut IniDocument) {
        let s = Self::SECTION;
        doc.ensure_section(s);
        self.enable_discord_presence.write(doc, s, "enable_discord_presence");
        Setting::fixed("false", false).write(doc, s, "check_for_updates_on_start");

        // Single shortcut set: quit from keyboard or pad
        doc.set(s, "Shortcuts\\shortcuts\\size", "1");
        doc.set(s, "Shortcuts\\shortcuts\\1\\name", "Exit citron");
        doc.set(s, "Shortcuts\\shortcuts\\1\\group", "Main Window");
        doc.set(s, "Shortcuts\\shortcuts\\1\\keyseq", "Ctrl+Q");
        doc.set(s, "Shortcuts\\shortcuts\\1\\controller_keyseq", "Y+ZL");
        doc.set(s, "Shortcuts\\shortcuts\\1\\context", "1");
        doc.set(s, "Shortcuts\\shortcuts\\1\\repeat", "false");

        self.language.write(doc, s, "Paths\\language");
        self.single_window_mode.write(doc, s, "singleWindowMode");
        self.select_user_on_boot.write(doc, s, "select_user_on_boot");
    }
}

/// `[Core]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSettings {
    pub use_multi_core: Setting,
    pub memory_layout_mode: Setting,
}

impl CoreSettings {
    pub fn from_options(options: &Options) -> Self {
        Self {
            use_multi_core: Setting::from_option(options, "multicore", "true"),
            memory_layout_mode: Setting::from_option(options, "yuzu_memory_layout", "0"),
        }
    }

    fn write(&self, doc: &mut IniDocument) {
        doc.ensure_section("Core");
        self.use_multi_core.write(doc, "Core", "use_multi_core");
        self.memory_layout_mode.write(doc, "Core", "memory_layout_mode");
    }
}

/// `[Renderer]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererSettings {
    pub aspect_ratio: Setting,
    pub backend: Setting,
    pub use_asynchronous_shaders: Setting,
    pub shader_backend: Setting,
    pub use_asynchronous_gpu_emulation: Setting,
    pub nvdec_emulation: Setting,
    /// `\default` always `false`
    pub gpu_accuracy: Setting,
    /// `\default` is `true` only for the adaptive mode `2`
    pub use_vsync: Setting,
    /// `\default` always `false`
    pub use_caches_gc: Setting,
    pub max_anisotropy: Setting,
    pub resolution_setup: Setting,
    pub scaling_filter: Setting,
    pub fsr2_quality_mode: Setting,
    pub anti_aliasing: Setting,
    pub accelerate_astc: Setting,
    pub astc_recompression: Setting,
}

impl RendererSettings {
    const SECTION: &'static str = "Renderer";

    pub fn from_options(options: &Options) -> Self {
        let vsync = options.get("vsync");
        Self {
            aspect_ratio: Setting::from_option(options, "yuzu_ratio", "0"),
            backend: Setting::from_option(options, "yuzu_backend", "1"),
            use_asynchronous_shaders: Setting::from_option(options, "async_shaders", "false"),
            shader_backend: Setting::from_option(options, "shaderbackend", "0"),
            use_asynchronous_gpu_emulation: Setting::from_option(options, "async_gpu", "true"),
            nvdec_emulation: Setting::from_option(options, "nvdec_emu", "2"),
            gpu_accuracy: Setting::fixed(options.get_or("gpuaccuracy", "0"), false),
            use_vsync: Setting::fixed(vsync.unwrap_or("1"), vsync == Some("2")),
            use_caches_gc: Setting::fixed(options.get_or("gpu_cache_gc", "false"), false),
            max_anisotropy: Setting::from_option(options, "anisotropy", "0"),
            resolution_setup: Setting::from_option(options, "resolution_scale", "2"),
            scaling_filter: Setting::from_option(options, "scale_filter", "1"),
            fsr2_quality_mode: Setting::from_option(options, "fsr_quality", "0"),
            anti_aliasing: Setting::from_option(options, "aliasing_method", "0"),
            accelerate_astc: Setting::from_option(options, "accelerate_astc", "1"),
            astc_recompression: Setting::from_option(options, "astc_recompression", "0"),
        }
    }

    fn write(&self, doc: &mut IniDocument) {
        let s = Self::SECTION;
        doc.ensure_section(s);
        self.aspect_ratio.write(doc, s, "aspect_ratio");
        self.backend.write(doc, s, "backend");
        self.use_asynchronous_shaders.write(doc, s, "use_asynchronous_shaders");
        self.shader_backend.write(doc, s, "shader_backend");
        self.use_asynchronous_gpu_emulation.write(doc, s, "use_asynchronous_gpu_emulation");
        self.nvdec_emulation.write(doc, s, "nvdec_emulation");
        self.gpu_accuracy.write(doc, s, "gpu_accuracy");
        self.use_vsync.write(doc, s, "use_vsync");
        self.use_caches_gc.write(doc, s, "use_caches_gc");
        self.max_anisotropy.write(doc, s, "max_anisotropy");
        self.resolution_setup.write(doc, s, "resolution_setup");
        self.scaling_filter.write(doc, s, "scaling_filter");
        self.fsr2_quality_mode.write(doc, s, "fsr2_quality_mode");
        self.anti_aliasing.write(doc, s, "anti_aliasing");
        self.accelerate_astc.write(doc, s, "accelerate_astc");
        self.astc_recompression.write(doc, s, "astc_recompression");
        Setting::fixed("false", true).write(doc, s, "async_astc");
    }
}

/// `[Cpu]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuSettings {
    pub cpu_accuracy: Setting,
}

impl CpuSettings {
    pub fn from_options(options: &Options) -> Self {
        Self { cpu_accuracy: Setting::from_option(options, "cpuaccuracy", "0") }
    }

    fn write(&self, doc: &mut IniDocument) {
        doc.ensure_section("Cpu");
        self.cpu_accuracy.write(doc, "Cpu", "cpu_accuracy");
    }
}

/// `[System]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSettings {
    pub language_index: Setting,
    pub sound_index: Setting,
    pub region_index: Setting,
    /// `None` leaves the template value alone (unrecognised `dock_mode`)
    pub use_docked_mode: Option<Setting>,
}

impl SystemSettings {
    pub fn from_options(options: &Options) -> Self {
        let use_docked_mode = match options.get("dock_mode") {
            None | Some("1") => Some(Setting::fixed("1", true)),
            Some("0") => Some(Setting::fixed("0", false)),
            Some(_) => None,
        };
        Self {
            language_index: Setting::from_option(options, "language", "1"),
            sound_index: Setting::from_option(options, "audio_mode", "1"),
            region_index: Setting::from_option(options, "region", "1"),
            use_docked_mode,
        }
    }

    fn write(&self, doc: &mut IniDocument) {
        doc.ensure_section("System");
        self.language_index.write(doc, "System", "language_index");
        self.sound_index.write(doc, "System", "sound_index");
        self.region_index.write(doc, "System", "region_index");
        if let Some(docked) = &self.use_docked_mode {
            docked.write(doc, "System", "use_docked_mode");
        }
    }
}

/// All option-driven sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdenSettings {
    pub ui: UiSettings,
    pub core: CoreSettings,
    pub renderer: RendererSettings,
    pub cpu: CpuSettings,
    pub system: SystemSettings,
}

impl EdenSettings {
    pub fn from_options(options: &Options) -> Self {
        Self {
            ui: UiSettings::from_options(options),
            core: CoreSettings::from_options(options),
            renderer: RendererSettings::from_options(options),
            cpu: CpuSettings::from_options(options),
            system: SystemSettings::from_options(options),
        }
    }

    pub fn write(&self, doc: &mut IniDocument) {
        self.ui.write(doc);
        self.core.write(doc);
        self.renderer.write(doc);
        self.cpu.write(doc);
        self.system.write(doc);
    }
}

/// `[WebService]` and `[Services]`: telemetry and BCAT off
pub fn write_service_sections(doc: &mut IniDocument) {
    doc.ensure_section("WebService");
    doc.set("WebService", "enable_telemetry", "false");
    doc.set("WebService", "enable_telemetry\\default", "false");

    doc.ensure_section("Services");
    doc.set("Services", "bcat_backend", "none");
    doc.set("Services", "bcat_backend\\default", "none");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> Options {
        pairs.iter().copied().collect()
    }

    fn render(options: &Options) -> IniDocument {
        let mut doc = IniDocument::new();
        EdenSettings::from_options(options).write(&mut doc);
        doc
    }

    #[test]
    fn test_defaults() {
        let doc = render(&Options::new());

        assert_eq!(doc.get("Renderer", "backend"), Some("1"));
        assert_eq!(doc.get("Renderer", "backend\\default"), Some("true"));
        assert_eq!(doc.get("Renderer", "resolution_setup"), Some("2"));
        assert_eq!(doc.get("Core", "use_multi_core"), Some("true"));
        assert_eq!(doc.get("UI", "Paths\\language"), Some("en"));
        assert_eq!(doc.get("UI", "enable_discord_presence\\default"), Some("false"));
        assert_eq!(doc.get("System", "use_docked_mode"), Some("1"));
        assert_eq!(doc.get("System", "use_docked_mode\\default"), Some("true"));
    }

    #[test]
    fn test_options_clear_default_flag() {
        let doc = render(&options(&[("yuzu_backend", "0"), ("cpuaccuracy", "2")]));

        assert_eq!(doc.get("Renderer", "backend"), Some("0"));
        assert_eq!(doc.get("Renderer", "backend\\default"), Some("false"));
        assert_eq!(doc.get("Cpu", "cpu_accuracy"), Some("2"));
        assert_eq!(doc.get("Cpu", "cpu_accuracy\\default"), Some("false"));
    }

    #[test]
    fn test_vsync_default_flag() {
        let unset = render(&Options::new());
        assert_eq!(unset.get("Renderer", "use_vsync"), Some("1"));
        assert_eq!(unset.get("Renderer", "use_vsync\\default"), Some("false"));

        let adaptive = render(&options(&[("vsync", "2")]));
        assert_eq!(adaptive.get("Renderer", "use_vsync\\default"), Some("true"));

        let off = render(&options(&[("vsync", "0")]));
        assert_eq!(off.get("Renderer", "use_vsync"), Some("0"));
        assert_eq!(off.get("Renderer", "use_vsync\\default"), Some("false"));
    }

    #[test]
    fn test_always_false_flags() {
        let doc = render(&options(&[("gpuaccuracy", "1")]));
        assert_eq!(doc.get("Renderer", "gpu_accuracy\\default"), Some("false"));
        assert_eq!(doc.get("Renderer", "use_caches_gc\\default"), Some("false"));
        assert_eq!(doc.get("Renderer", "async_astc"), Some("false"));
        assert_eq!(doc.get("Renderer", "async_astc\\default"), Some("true"));
    }

    #[test]
    fn test_dock_mode() {
        let handheld = render(&options(&[("dock_mode", "0")]));
        assert_eq!(handheld.get("System", "use_docked_mode"), Some("0"));
        assert_eq!(handheld.get("System", "use_docked_mode\\default"), Some("false"));

        let other = render(&options(&[("dock_mode", "auto")]));
        assert_eq!(other.get("System", "use_docked_mode"), None);
    }

    #[test]
    fn test_service_sections() {
        let mut doc = IniDocument::new();
        write_service_sections(&mut doc);
        assert_eq!(doc.get("WebService", "enable_telemetry"), Some("false"));
        assert_eq!(doc.get("Services", "bcat_backend\\default"), Some("none"));
    }
}
