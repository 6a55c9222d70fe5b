use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder};

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x58_65_F2;

/// Discord limit on embed titles, in characters.
pub const EMBED_TITLE_MAX_CHARS: usize = 256;
/// Discord limit on embed field values, in characters.
pub const EMBED_FIELD_VALUE_MAX_CHARS: usize = 1024;

/// A single non-inline embed field.
#[derive(Clone, Debug)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Build a standard embed with consistent styling.
///
/// Fields are stacked vertically; the footer is omitted when empty.
pub fn build_titled_embed(
    title: &str,
    description: impl Into<String>,
    fields: &[EmbedField],
    footer: Option<&str>,
) -> anyhow::Result<Embed> {
    let title: String = title.chars().take(EMBED_TITLE_MAX_CHARS).collect();

    let mut builder = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description);

    for field in fields {
        let field = EmbedFieldBuilder::new(field.name.clone(), field.value.clone()).build();
        builder = builder.field(field);
    }

    if let Some(text) = footer.filter(|text| !text.is_empty()) {
        builder = builder.footer(EmbedFooterBuilder::new(text).build());
    }

    Ok(builder.validate()?.build())
}
