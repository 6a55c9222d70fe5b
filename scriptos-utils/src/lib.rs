/// Delayed cleanup of short-lived bot messages.
pub mod cleanup;
/// Link-button component builders.
pub mod components;
/// Generic embed builders shared across commands.
pub mod embed;
/// Interaction response helpers, including the deferred two-phase flow.
pub mod interaction;
/// Pure text helpers for previews and code blocks.
pub mod text;

/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Leading character of slash commands typed as plain text.
pub const SLASH_PREFIX: char = '/';
