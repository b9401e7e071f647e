use log::debug;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const RC_FILE_NAME: &str = ".richnoterc";

/// Lowercases and drops separators so `copy_line`, `CopyLine` and
/// `copy-line` all read the same.
fn normalize_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// What a copy does while text is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAction {
    None,
    CopySelected,
    CopyLine,
    CopyAll,
}

/// What a copy does when nothing is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFallbackAction {
    None,
    CopyLine,
    CopyNote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteAction {
    None,
    Paste,
    PasteAndReplaceAll,
    PasteAtEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue(pub String);

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl FromStr for CopyAction {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_name(value).as_str() {
            "none" | "0" => Ok(CopyAction::None),
            "copyselected" | "selected" | "1" => Ok(CopyAction::CopySelected),
            "copyline" | "line" | "2" => Ok(CopyAction::CopyLine),
            "copyall" | "all" | "3" => Ok(CopyAction::CopyAll),
            _ => Err(UnknownValue(value.to_string())),
        }
    }
}

impl FromStr for CopyFallbackAction {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_name(value).as_str() {
            "none" | "0" => Ok(CopyFallbackAction::None),
            "copyline" | "line" | "1" => Ok(CopyFallbackAction::CopyLine),
            "copynote" | "note" | "2" => Ok(CopyFallbackAction::CopyNote),
            _ => Err(UnknownValue(value.to_string())),
        }
    }
}

impl FromStr for PasteAction {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_name(value).as_str() {
            "none" | "0" => Ok(PasteAction::None),
            "paste" | "1" => Ok(PasteAction::Paste),
            "pasteandreplaceall" | "replaceall" | "2" => Ok(PasteAction::PasteAndReplaceAll),
            "pasteatend" | "atend" | "3" => Ok(PasteAction::PasteAtEnd),
            _ => Err(UnknownValue(value.to_string())),
        }
    }
}

/// The action, fallback and trim flags used for one copy or cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyPolicy {
    pub action: CopyAction,
    pub trim: bool,
    pub fallback: CopyFallbackAction,
    pub fallback_trim: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PastePolicy {
    pub action: PasteAction,
    pub trim: bool,
}

/// Snapshot of every option the editing engine reads.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub tab_uses_spaces: bool,
    pub tab_width: usize,
    pub convert_indentation_on_paste: bool,
    pub auto_indent: bool,

    pub copy_action: CopyAction,
    pub trim_on_copy: bool,
    pub copy_alt_action: CopyAction,
    pub trim_on_alt_copy: bool,
    pub copy_fallback_action: CopyFallbackAction,
    pub trim_on_fallback_copy: bool,
    pub copy_alt_fallback_action: CopyFallbackAction,
    pub trim_on_alt_fallback_copy: bool,
    pub copy_on_select: bool,

    pub paste_action: PasteAction,
    pub trim_on_paste: bool,
    pub paste_alt_action: PasteAction,
    pub trim_on_alt_paste: bool,
    pub middle_click_paste: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_uses_spaces: false,
            tab_width: 4,
            convert_indentation_on_paste: false,
            auto_indent: true,

            copy_action: CopyAction::CopySelected,
            trim_on_copy: false,
            copy_alt_action: CopyAction::CopySelected,
            trim_on_alt_copy: true,
            copy_fallback_action: CopyFallbackAction::CopyLine,
            trim_on_fallback_copy: false,
            copy_alt_fallback_action: CopyFallbackAction::CopyNote,
            trim_on_alt_fallback_copy: false,
            copy_on_select: false,

            paste_action: PasteAction::Paste,
            trim_on_paste: false,
            paste_alt_action: PasteAction::Paste,
            trim_on_alt_paste: true,
            middle_click_paste: true,
        }
    }
}

impl EditorConfig {
    /// Copy settings for the primary or, with the modifier held, the
    /// alternate binding.
    pub fn copy_policy(&self, modifier_active: bool) -> CopyPolicy {
        if modifier_active {
            CopyPolicy {
                action: self.copy_alt_action,
                trim: self.trim_on_alt_copy,
                fallback: self.copy_alt_fallback_action,
                fallback_trim: self.trim_on_alt_fallback_copy,
            }
        } else {
            CopyPolicy {
                action: self.copy_action,
                trim: self.trim_on_copy,
                fallback: self.copy_fallback_action,
                fallback_trim: self.trim_on_fallback_copy,
            }
        }
    }

    pub fn paste_policy(&self, modifier_active: bool) -> PastePolicy {
        if modifier_active {
            PastePolicy {
                action: self.paste_alt_action,
                trim: self.trim_on_alt_paste,
            }
        } else {
            PastePolicy {
                action: self.paste_action,
                trim: self.trim_on_paste,
            }
        }
    }

    /// One indent unit: a tab, or `tab_width` spaces.
    pub fn indent_unit(&self) -> String {
        if self.tab_uses_spaces {
            " ".repeat(self.tab_width)
        } else {
            "\t".to_string()
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Looks for `.richnoterc` in the current directory, then in `$HOME`.
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(RC_FILE_NAME);
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(RC_FILE_NAME);
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    pub fn load_config() -> EditorConfig {
        match Self::get_rc_path() {
            Some(path) => Self::load_from(&path),
            None => EditorConfig::default(),
        }
    }

    /// Reads one rc file; an unreadable file yields the defaults.
    pub fn load_from(path: &Path) -> EditorConfig {
        let mut config = EditorConfig::default();
        match fs::read_to_string(path) {
            Ok(content) => Self::parse_config_content(&content, &mut config),
            Err(err) => debug!("Could not read {}: {err}", path.display()),
        }
        config
    }

    pub fn parse_config_content(content: &str, config: &mut EditorConfig) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }
            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut EditorConfig) {
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        if let Some(setting) = line.strip_prefix("set ") {
            let setting = setting.trim();
            match setting.split_once('=') {
                Some((key, value)) => Self::apply_setting(key.trim(), value.trim(), config),
                None => match setting.strip_prefix("no") {
                    Some(key) if Self::is_flag(key) => Self::apply_setting(key, "false", config),
                    _ => Self::apply_setting(setting, "true", config),
                },
            }
        } else if let Some((key, value)) = line.split_once('=') {
            Self::apply_setting(key.trim(), value.trim(), config);
        }
    }

    fn is_flag(key: &str) -> bool {
        Self::flag(&mut EditorConfig::default(), key).is_some()
    }

    /// The boolean option called `key`.
    fn flag<'a>(config: &'a mut EditorConfig, key: &str) -> Option<&'a mut bool> {
        let flag = match key {
            "expandtab" | "tab_uses_spaces" => &mut config.tab_uses_spaces,
            "convert_indentation" | "convert_indentation_on_paste" => {
                &mut config.convert_indentation_on_paste
            }
            "autoindent" | "auto_indent" => &mut config.auto_indent,
            "trim_on_copy" => &mut config.trim_on_copy,
            "trim_on_alt_copy" => &mut config.trim_on_alt_copy,
            "trim_on_fallback_copy" => &mut config.trim_on_fallback_copy,
            "trim_on_alt_fallback_copy" => &mut config.trim_on_alt_fallback_copy,
            "autocopy" | "copy_on_select" => &mut config.copy_on_select,
            "trim_on_paste" => &mut config.trim_on_paste,
            "trim_on_alt_paste" => &mut config.trim_on_alt_paste,
            "middle_click_paste" => &mut config.middle_click_paste,
            _ => return None,
        };
        Some(flag)
    }

    fn apply_setting(key: &str, value: &str, config: &mut EditorConfig) {
        if let Some(flag) = Self::flag(config, key) {
            match parse_bool(value) {
                Some(enabled) => *flag = enabled,
                None => debug!("Ignoring {key}={value}: not a boolean"),
            }
            return;
        }

        let applied = match key {
            "tabstop" | "tab_width" => match value.parse::<usize>() {
                Ok(width) if (1..=16).contains(&width) => {
                    config.tab_width = width;
                    true
                }
                _ => false,
            },
            "copy_action" => value.parse().map(|a| config.copy_action = a).is_ok(),
            "copy_alt_action" => value.parse().map(|a| config.copy_alt_action = a).is_ok(),
            "copy_fallback_action" => value
                .parse()
                .map(|a| config.copy_fallback_action = a)
                .is_ok(),
            "copy_alt_fallback_action" => value
                .parse()
                .map(|a| config.copy_alt_fallback_action = a)
                .is_ok(),
            "paste_action" => value.parse().map(|a| config.paste_action = a).is_ok(),
            "paste_alt_action" => value.parse().map(|a| config.paste_alt_action = a).is_ok(),
            _ => {
                debug!("Ignoring unknown setting {key}");
                return;
            }
        };
        if !applied {
            debug!("Ignoring {key}={value}: invalid value");
        }
    }

    pub fn generate_sample_rc() -> String {
        r#"# richnote configuration file (.richnoterc)
# Lines starting with # or " are comments

# Indentation
set tabstop=4               # Tab width in spaces (1-16)
set noexpandtab             # Tab inserts a tab character (set expandtab for spaces)
set autoindent              # Return keeps the current line's indentation
convert_indentation=false   # Convert tabs/spaces on paste

# Copy: actions are none, copy_selected, copy_line, copy_all
copy_action=copy_selected
trim_on_copy=false
copy_alt_action=copy_selected   # With Shift held
trim_on_alt_copy=true

# Copy with nothing selected: none, copy_line, copy_note
copy_fallback_action=copy_line
trim_on_fallback_copy=false
copy_alt_fallback_action=copy_note
trim_on_alt_fallback_copy=false
set noautocopy              # Copy text as soon as it is selected

# Paste: none, paste, paste_and_replace_all, paste_at_end
paste_action=paste
trim_on_paste=false
paste_alt_action=paste
trim_on_alt_paste=true
middle_click_paste=true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.tab_width, 4);
        assert!(!config.tab_uses_spaces);
        assert_eq!(config.copy_fallback_action, CopyFallbackAction::CopyLine);
        assert_eq!(config.copy_alt_fallback_action, CopyFallbackAction::CopyNote);
        assert!(config.trim_on_alt_copy);
        assert!(config.middle_click_paste);
    }

    #[test]
    fn test_parse_vim_style_config() {
        let mut config = EditorConfig::default();
        let content = r#"
            set expandtab
            set tabstop=8
            set autocopy
            set noautoindent
            set copy_action=copy_all
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert!(config.tab_uses_spaces);
        assert_eq!(config.tab_width, 8);
        assert!(config.copy_on_select);
        assert!(!config.auto_indent);
        assert_eq!(config.copy_action, CopyAction::CopyAll);
    }

    #[test]
    fn test_parse_key_value_config() {
        let mut config = EditorConfig::default();
        let content = r#"
            tab_width=2
            tab_uses_spaces=yes
            copy_fallback_action=CopyNote
            paste_alt_action=paste-at-end
            trim_on_paste=1
            copy_alt_action=2
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert_eq!(config.tab_width, 2);
        assert!(config.tab_uses_spaces);
        assert_eq!(config.copy_fallback_action, CopyFallbackAction::CopyNote);
        assert_eq!(config.paste_alt_action, PasteAction::PasteAtEnd);
        assert!(config.trim_on_paste);
        assert_eq!(config.copy_alt_action, CopyAction::CopyLine);
    }

    #[test]
    fn test_invalid_values_ignored() {
        let mut config = EditorConfig::default();
        let content = r#"
            set tabstop=0          # Invalid: too small
            tabstop=20             # Invalid: too large
            copy_action=sideways   # Unknown action
            middle_click_paste=maybe
            unknown_setting=value
        "#;

        RcLoader::parse_config_content(content, &mut config);

        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_sample_rc_parses_to_defaults() {
        let mut config = EditorConfig::default();
        RcLoader::parse_config_content(&RcLoader::generate_sample_rc(), &mut config);
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "set expandtab\ntab_width=3").unwrap();
        let config = RcLoader::load_from(file.path());
        assert!(config.tab_uses_spaces);
        assert_eq!(config.tab_width, 3);

        let missing = RcLoader::load_from(Path::new("/nonexistent/.richnoterc"));
        assert_eq!(missing, EditorConfig::default());
    }

    #[test]
    fn test_policies_follow_modifier() {
        let config = EditorConfig::default();
        let primary = config.copy_policy(false);
        assert_eq!(primary.fallback, CopyFallbackAction::CopyLine);
        assert!(!primary.trim);
        let alternate = config.copy_policy(true);
        assert_eq!(alternate.fallback, CopyFallbackAction::CopyNote);
        assert!(alternate.trim);
        assert!(config.paste_policy(true).trim);
        assert_eq!(config.indent_unit(), "\t");
    }
}
