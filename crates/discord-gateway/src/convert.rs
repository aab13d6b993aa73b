//! Conversions between core types and serenity models/builders.

use bot_core::{
    ActionRow, ButtonStyle, CommandSpec, Embed, ParamKind, Permission, PermissionSet, RawArgs,
    Reply, UserId, UserProfile,
};
use chrono::{DateTime, Utc};
use serenity::builder::{
    CreateActionRow, CreateButton, CreateCommand, CreateCommandOption, CreateEmbed,
    CreateEmbedAuthor, CreateEmbedFooter, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, CreateSelectMenu, CreateSelectMenuKind,
    CreateSelectMenuOption, EditInteractionResponse, EditMessage,
};
use serenity::model::application::{
    ButtonStyle as DiscordButtonStyle, CommandDataOption, CommandDataOptionValue,
    CommandOptionType,
};
use serenity::model::channel::ReactionType;
use serenity::model::id::RoleId;
use serenity::model::permissions::Permissions;
use serenity::model::user::{User, UserPublicFlags};
use serenity::model::Timestamp;
use std::collections::BTreeMap;

/// Discord rejects command descriptions longer than this.
const MAX_DESCRIPTION: usize = 100;

const PERMISSIONS: [(Permission, Permissions); 7] = [
    (Permission::Administrator, Permissions::ADMINISTRATOR),
    (Permission::ManageGuild, Permissions::MANAGE_GUILD),
    (Permission::ManageMessages, Permissions::MANAGE_MESSAGES),
    (Permission::SendMessages, Permissions::SEND_MESSAGES),
    (Permission::EmbedLinks, Permissions::EMBED_LINKS),
    (Permission::AttachFiles, Permissions::ATTACH_FILES),
    (Permission::ReadMessageHistory, Permissions::READ_MESSAGE_HISTORY),
];

const BADGES: [(UserPublicFlags, &str); 11] = [
    (UserPublicFlags::DISCORD_EMPLOYEE, "Discord Employee"),
    (UserPublicFlags::PARTNERED_SERVER_OWNER, "Partnered Server Owner"),
    (UserPublicFlags::HYPESQUAD_EVENTS, "Hypesquad Events"),
    (UserPublicFlags::BUG_HUNTER_LEVEL_1, "Bug Hunter"),
    (UserPublicFlags::HOUSE_BRAVERY, "Hypesquad Bravery"),
    (UserPublicFlags::HOUSE_BRILLIANCE, "Hypesquad Brilliance"),
    (UserPublicFlags::HOUSE_BALANCE, "Hypesquad Balance"),
    (UserPublicFlags::EARLY_SUPPORTER, "Early Supporter"),
    (UserPublicFlags::BUG_HUNTER_LEVEL_2, "Bug Hunter Level 2"),
    (UserPublicFlags::VERIFIED_BOT, "Verified Bot"),
    (UserPublicFlags::EARLY_VERIFIED_BOT_DEVELOPER, "Early Verified Bot Developer"),
];

pub fn permission_set(granted: Permissions) -> PermissionSet {
    PERMISSIONS
        .iter()
        .filter(|(_, bits)| granted.contains(*bits))
        .map(|(permission, _)| *permission)
        .collect()
}

pub fn badges(flags: Option<UserPublicFlags>) -> Vec<String> {
    let Some(flags) = flags else {
        return Vec::new();
    };
    BADGES
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, name)| (*name).to_string())
        .collect()
}

pub fn to_utc(timestamp: Timestamp) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp.unix_timestamp(), 0).unwrap_or_default()
}

pub fn user_profile(user: &User) -> UserProfile {
    let mut profile = UserProfile::new(UserId(user.id.get()), user.tag(), to_utc(user.id.created_at()));
    profile.avatar_url = Some(user.face());
    profile.badges = badges(user.public_flags);
    profile.bot = user.bot;
    profile
}

/// Add guild membership details to a profile. Roles are rendered as mentions.
pub fn apply_membership(profile: &mut UserProfile, joined_at: Option<Timestamp>, roles: &[RoleId]) {
    profile.joined_at = joined_at.map(to_utc);
    profile.roles = roles.iter().map(|role| format!("<@&{}>", role)).collect();
}

/// Slash command options as named raw arguments.
pub fn named_options(options: &[CommandDataOption]) -> RawArgs {
    let named: BTreeMap<String, String> = options
        .iter()
        .filter_map(|option| {
            let value = match &option.value {
                CommandDataOptionValue::String(s) => s.clone(),
                CommandDataOptionValue::Integer(i) => i.to_string(),
                CommandDataOptionValue::Number(n) => n.to_string(),
                CommandDataOptionValue::Boolean(b) => b.to_string(),
                CommandDataOptionValue::User(id) => id.get().to_string(),
                _ => return None,
            };
            Some((option.name.clone(), value))
        })
        .collect();
    RawArgs::Named(named)
}

/// Slash command registration payload for a registered command.
pub fn command_definition(spec: &CommandSpec) -> CreateCommand {
    let description: String = spec.summary().chars().take(MAX_DESCRIPTION).collect();
    spec.params.iter().fold(
        CreateCommand::new(&spec.name).description(description),
        |command, param| {
            let kind = match param.kind {
                ParamKind::String => CommandOptionType::String,
                ParamKind::Integer => CommandOptionType::Integer,
                ParamKind::User => CommandOptionType::User,
            };
            let description: String = param.description.chars().take(MAX_DESCRIPTION).collect();
            command.add_option(
                CreateCommandOption::new(kind, &param.name, description).required(param.required),
            )
        },
    )
}

pub fn build_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new().colour(embed.colour.0);
    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    for field in &embed.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    if let Some(author) = &embed.author {
        let mut a = CreateEmbedAuthor::new(&author.name);
        if let Some(icon) = &author.icon_url {
            a = a.icon_url(icon);
        }
        builder = builder.author(a);
    }
    if let Some(footer) = &embed.footer {
        builder = builder.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(image) = &embed.image {
        builder = builder.image(image);
    }
    if let Some(thumbnail) = &embed.thumbnail {
        builder = builder.thumbnail(thumbnail);
    }
    if let Some(at) = embed.timestamp {
        if let Ok(timestamp) = Timestamp::from_unix_timestamp(at.timestamp()) {
            builder = builder.timestamp(timestamp);
        }
    }
    builder
}

fn button_style(style: ButtonStyle) -> DiscordButtonStyle {
    match style {
        ButtonStyle::Primary => DiscordButtonStyle::Primary,
        ButtonStyle::Secondary => DiscordButtonStyle::Secondary,
        ButtonStyle::Success => DiscordButtonStyle::Success,
        ButtonStyle::Danger => DiscordButtonStyle::Danger,
    }
}

pub fn action_rows(rows: &[ActionRow]) -> Vec<CreateActionRow> {
    rows.iter()
        .map(|row| match row {
            ActionRow::Buttons(buttons) => CreateActionRow::Buttons(
                buttons
                    .iter()
                    .map(|b| {
                        CreateButton::new(&b.custom_id)
                            .label(&b.label)
                            .style(button_style(b.style))
                    })
                    .collect(),
            ),
            ActionRow::Select(menu) => {
                let options = menu
                    .options
                    .iter()
                    .map(|o| {
                        let mut option = CreateSelectMenuOption::new(&o.label, &o.value);
                        if let Some(description) = &o.description {
                            option = option.description(description);
                        }
                        if let Some(emoji) = &o.emoji {
                            option = option.emoji(ReactionType::Unicode(emoji.clone()));
                        }
                        option
                    })
                    .collect();
                let mut select =
                    CreateSelectMenu::new(&menu.custom_id, CreateSelectMenuKind::String { options });
                if let Some(placeholder) = &menu.placeholder {
                    select = select.placeholder(placeholder);
                }
                CreateActionRow::SelectMenu(select)
            }
        })
        .collect()
}

/// Fill a builder for a new message. Absent parts are left out.
macro_rules! fill_new {
    ($builder:expr, $reply:expr) => {{
        let reply: &Reply = $reply;
        let mut builder = $builder;
        if let Some(content) = &reply.content {
            builder = builder.content(content);
        }
        if let Some(e) = &reply.embed {
            builder = builder.embed(build_embed(e));
        }
        if !reply.components.is_empty() {
            builder = builder.components(action_rows(&reply.components));
        }
        builder
    }};
}

/// Fill a builder that replaces an existing message. Absent parts are cleared.
macro_rules! fill_edit {
    ($builder:expr, $reply:expr) => {{
        let reply: &Reply = $reply;
        $builder
            .content(reply.content.clone().unwrap_or_default())
            .embeds(reply.embed.iter().map(build_embed).collect())
            .components(action_rows(&reply.components))
    }};
}

pub fn create_message(reply: &Reply) -> CreateMessage {
    fill_new!(CreateMessage::new(), reply)
}

pub fn edit_message(reply: &Reply) -> EditMessage {
    fill_edit!(EditMessage::new(), reply)
}

pub fn interaction_message(reply: &Reply) -> CreateInteractionResponseMessage {
    fill_new!(CreateInteractionResponseMessage::new(), reply)
}

pub fn followup(reply: &Reply) -> CreateInteractionResponseFollowup {
    fill_new!(CreateInteractionResponseFollowup::new(), reply)
}

pub fn edit_followup(reply: &Reply) -> CreateInteractionResponseFollowup {
    fill_edit!(CreateInteractionResponseFollowup::new(), reply)
}

pub fn edit_response(reply: &Reply) -> EditInteractionResponse {
    fill_edit!(EditInteractionResponse::new(), reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bot_core::ParamSpec;

    #[test]
    fn test_permission_set() {
        let set = permission_set(Permissions::SEND_MESSAGES | Permissions::EMBED_LINKS);
        assert!(set.grants(Permission::EmbedLinks));
        assert!(!set.grants(Permission::ManageMessages));

        let admin = permission_set(Permissions::ADMINISTRATOR);
        assert!(admin.grants(Permission::ManageGuild));
    }

    #[test]
    fn test_badges() {
        assert!(badges(None).is_empty());
        let names = badges(Some(UserPublicFlags::HOUSE_BRAVERY | UserPublicFlags::EARLY_SUPPORTER));
        assert_eq!(names, vec!["Hypesquad Bravery", "Early Supporter"]);
    }

    #[test]
    fn test_to_utc() {
        let ts = Timestamp::from_unix_timestamp(1_600_000_000).unwrap();
        assert_eq!(to_utc(ts).timestamp(), 1_600_000_000);
    }

    #[test]
    fn test_command_definition_with_options() {
        let mut registry = bot_core::CommandRegistry::new(
            bot_core::Guard::new(std::sync::Arc::new(NoBlacklist)),
            Vec::new(),
        );
        registry
            .register("cat", "Get a cat image with a word.", Noop)
            .param(ParamSpec::string("word", "Provide a word."))
            .param(ParamSpec::integer("size", "Provide size of the image."));
        let spec = registry.get("cat").unwrap();
        assert_eq!(spec.params.len(), 2);
        // Builders are opaque; this only checks that building does not panic.
        let _ = command_definition(spec);
    }

    struct NoBlacklist;

    #[async_trait::async_trait]
    impl bot_core::Blacklist for NoBlacklist {
        async fn contains(&self, _user: UserId) -> bool {
            false
        }
    }

    struct Noop;

    #[async_trait::async_trait]
    impl bot_core::CommandHandler for Noop {
        async fn execute(&self, _invocation: &bot_core::Invocation<'_>) -> bot_core::CommandResult {
            Ok(())
        }
    }
}
