/// Which attribute of a tag carries an asset link, and which file
/// extensions are worth downloading for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetRule {
    pub tag: &'static str,
    pub attribute: &'static str,
    pub extensions: &'static [&'static str],
}

impl AssetRule {
    /// `extension` includes the leading dot and is matched case-sensitively
    pub fn accepts(&self, extension: &str) -> bool {
        self.extensions.contains(&extension)
    }
}

pub const IMG: AssetRule = AssetRule {
    tag: "img",
    attribute: "src",
    extensions: &[".png", ".jpg", ".jpeg", ".svg", ".gif", ".webp", ".ico"],
};

pub const LINK: AssetRule = AssetRule {
    tag: "link",
    attribute: "href",
    extensions: &[".ico", ".png", ".css"],
};

pub const SCRIPT: AssetRule = AssetRule {
    tag: "script",
    attribute: "src",
    extensions: &[".js"],
};

pub const ASSET_RULES: [AssetRule; 3] = [IMG, LINK, SCRIPT];

/// Rule for a tag name, if the tag can carry a downloadable asset
pub fn rule_for_tag(tag: &str) -> Option<&'static AssetRule> {
    match tag {
        "img" => Some(&IMG),
        "link" => Some(&LINK),
        "script" => Some(&SCRIPT),
        _ => None,
    }
}
