/// Restricts the bot's features to a single channel, matched by name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChannelGate {
    channel_name: String,
}

impl ChannelGate {
    pub fn new(channel_name: impl Into<String>) -> Self {
        Self {
            channel_name: channel_name.into(),
        }
    }

    /// Name of the only channel where the bot acts.
    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn is_authorized(&self, channel_name: &str) -> bool {
        channel_name == self.channel_name
    }

    /// Same as [`Self::is_authorized`] for sources that may not know the name.
    pub fn is_authorized_opt(&self, channel_name: Option<&str>) -> bool {
        channel_name.is_some_and(|name| self.is_authorized(name))
    }
}
