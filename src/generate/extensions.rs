use serde::Deserialize;

use super::Output;
use crate::condition::ConditionTracker;
use crate::entry::wrap_predicate;

/// Prefix shared by every Vulkan extension name
const EXTENSION_PREFIX: &str = "VK_";

/// A tracked device extension, identified by its registry name (`VK_EXT_robustness2`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "ExtensionDef")]
pub struct Extension {
    name: String,
    define: Option<String>,
}

/// Either a bare name or `{ "name", "define"? }`
#[derive(Deserialize)]
#[serde(untagged)]
enum ExtensionDef {
    Name(String),
    Full { name: String, define: Option<String> },
}

impl Extension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            define: None,
        }
    }

    /// Use `define` verbatim instead of deriving the name macro
    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.define = Some(define.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Boolean field recording support: `VK_EXT_robustness2` -> `has_EXT_robustness2`.
    ///
    /// A name without the `VK_` prefix is used whole.
    pub fn flag_field(&self) -> String {
        let stem = self
            .name
            .strip_prefix(EXTENSION_PREFIX)
            .unwrap_or(&self.name);
        format!("has_{}", stem)
    }

    /// Header macro holding the name string: `VK_EXT_robustness2` -> `VK_EXT_ROBUSTNESS_2_EXTENSION_NAME`
    ///
    /// The derived form separates a trailing version number with `_`. The
    /// registry is not consistent about this (`VK_KHR_shader_float16_int8` has
    /// `VK_KHR_SHADER_FLOAT16_INT8_EXTENSION_NAME`), so such extensions carry
    /// the macro explicitly via [`Extension::with_define`].
    pub fn define_token(&self) -> String {
        if let Some(define) = &self.define {
            return define.clone();
        }

        let upper = self.name.to_ascii_uppercase();
        let stem_len = upper.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let (stem, version) = upper.split_at(stem_len);

        if version.is_empty() || stem.is_empty() || stem.ends_with('_') {
            format!("{}_EXTENSION_NAME", upper)
        } else {
            format!("{}_{}_EXTENSION_NAME", stem, version)
        }
    }
}

impl From<String> for Extension {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<ExtensionDef> for Extension {
    fn from(def: ExtensionDef) -> Self {
        match def {
            ExtensionDef::Name(name) => Self::new(name),
            ExtensionDef::Full { name, define } => Self { name, define },
        }
    }
}

/// Names the generated check code uses for its surroundings
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Pointer to the struct holding the flags
    pub target: String,
    pub names_var: String,
    pub count_var: String,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            target: "vk".to_string(),
            names_var: "device_extensions".to_string(),
            count_var: "num_device_extensions".to_string(),
        }
    }
}

/// One `bool` field per tracked extension, for the header
pub fn extension_flag_fields(extensions: &[Extension]) -> Vec<String> {
    let mut output = Output::new();
    for extension in extensions {
        output.line(1, &format!("bool {};", extension.flag_field()));
    }
    output.finish()
}

/// Reset every flag, then match each runtime extension name against the tracked ones.
///
/// Each comparison is guarded on the extension's own macro so that older
/// Vulkan headers lacking it still compile.
pub fn extension_checks(extensions: &[Extension], options: &CheckOptions) -> Vec<String> {
    let mut output = Output::new();
    let target = &options.target;

    output.line(1, "// Reset before filling out.");
    for extension in extensions {
        output.line(1, &format!("{}->{} = false;", target, extension.flag_field()));
    }
    output.blank();

    output.line(
        1,
        &format!("for (uint32_t i = 0; i < {}; i++) {{", options.count_var),
    );
    output.line(2, &format!("const char *ext = {}[i];", options.names_var));
    output.blank();

    let mut tracker = ConditionTracker::new();
    for extension in extensions {
        let condition = wrap_predicate(extension.name());
        output.extend(tracker.process(Some(condition.as_str())));
        output.line(
            2,
            &format!("if (strcmp(ext, {}) == 0) {{", extension.define_token()),
        );
        output.line(3, &format!("{}->{} = true;", target, extension.flag_field()));
        output.line(3, "continue;");
        output.line(2, "}");
    }
    output.extend(tracker.finish());
    output.line(1, "}");

    output.finish()
}
