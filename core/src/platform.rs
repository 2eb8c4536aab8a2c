/// Platform tags the manager syncs. Reporting-only lookup; the purge core
/// treats the tag as an opaque partition key.
pub const KNOWN_PLATFORMS: &[(&str, i64, &str)] = &[
    ("xiaohongshu", 1, "Xiaohongshu"),
    ("wechat", 2, "WeChat Channels"),
    ("douyin", 3, "Douyin"),
    ("kuaishou", 4, "Kuaishou"),
    ("tiktok", 5, "TikTok"),
];

pub fn display_name(tag: &str) -> Option<&'static str> {
    KNOWN_PLATFORMS
        .iter()
        .find(|(name, _, _)| *name == tag)
        .map(|(_, _, display)| *display)
}

pub fn platform_type(tag: &str) -> Option<i64> {
    KNOWN_PLATFORMS
        .iter()
        .find(|(name, _, _)| *name == tag)
        .map(|(_, ty, _)| *ty)
}

pub fn platform_tag(ty: i64) -> Option<&'static str> {
    KNOWN_PLATFORMS
        .iter()
        .find(|(_, t, _)| *t == ty)
        .map(|(name, _, _)| *name)
}
