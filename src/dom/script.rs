use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

const PRELUDE: &str = include_str!("js/prelude.js");

const NAME_PREFIX: &str = "// page-script: ";
const ARGS_PREFIX: &str = "// page-args: ";

/// A JavaScript function expression shipped with the crate and run inside the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageScript {
    pub name: &'static str,
    source: &'static str,
}

impl PageScript {
    pub const WAIT_FOR_SLIDES: PageScript = PageScript::new("wait_for_slides", include_str!("js/wait_for_slides.js"));
    pub const ENUMERATE_SLIDES: PageScript = PageScript::new("enumerate_slides", include_str!("js/enumerate_slides.js"));
    pub const SNAPSHOT_SLIDE: PageScript = PageScript::new("snapshot_slide", include_str!("js/snapshot_slide.js"));
    pub const SLIDE_RECT: PageScript = PageScript::new("slide_rect", include_str!("js/slide_rect.js"));
    pub const LOCATE_CANDIDATES: PageScript =
        PageScript::new("locate_candidates", include_str!("js/locate_candidates.js"));
    pub const EXTRACT_SVG: PageScript = PageScript::new("extract_svg", include_str!("js/extract_svg.js"));
    pub const ISOLATE_ELEMENT: PageScript = PageScript::new("isolate_element", include_str!("js/isolate_element.js"));
    pub const RESTORE_OPACITY: PageScript = PageScript::new("restore_opacity", include_str!("js/restore_opacity.js"));

    const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    /// Build a self-invoking expression that calls the script with `args`.
    ///
    /// The two header lines are plain comments for the page; hosts read them
    /// back with [`ScriptHeader::parse`].
    pub fn render(&self, args: &impl Serialize) -> Result<String> {
        let args = serde_json::to_string(args)?;
        Ok(format!(
            "{NAME_PREFIX}{name}\n{ARGS_PREFIX}{args}\n(function () {{\n{PRELUDE}\nreturn ({source})({args});\n}})()",
            name = self.name,
            source = self.source.trim_end(),
        ))
    }
}

/// Name and arguments recovered from a rendered page script
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptHeader<'a> {
    pub name: &'a str,
    pub args: Value,
}

impl<'a> ScriptHeader<'a> {
    /// Read the header of a script produced by [`PageScript::render`]
    pub fn parse(script: &'a str) -> Option<Self> {
        let mut lines = script.lines();
        let name = lines.next()?.strip_prefix(NAME_PREFIX)?.trim();
        let args = lines.next()?.strip_prefix(ARGS_PREFIX)?;
        let args = serde_json::from_str(args).ok()?;
        Some(Self { name, args })
    }
}
