use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};

/// Build a single action row holding one link button.
///
/// Link buttons carry a URL instead of a custom ID and never produce interactions.
pub fn link_button_row(label: &str, url: &str) -> Vec<Component> {
    vec![Component::ActionRow(ActionRow {
        id: None,
        components: vec![Component::Button(Button {
            id: None,
            custom_id: None,
            disabled: false,
            emoji: None,
            label: Some(label.to_owned()),
            style: ButtonStyle::Link,
            url: Some(url.to_owned()),
            sku_id: None,
        })],
    })]
}
