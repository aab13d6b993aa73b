//! Gateway event handler: turns serenity events into pipeline invocations.

use crate::convert;
use crate::outbox::{ChannelOutbox, InteractionOutbox};
use crate::presence;
use async_trait::async_trait;
use bot_core::{
    parse_text_invocation, CommandPipeline, ComponentEvent, ExecutionContext, GuildInfo,
    InteractionController, Outbox, PermissionSet, RawArgs, Surface,
};
use serenity::all::{
    Command, CommandInteraction, ComponentInteraction, ComponentInteractionDataKind,
    CreateCommand, CreateInteractionResponse, Interaction, OnlineStatus, Ready, ShardManager,
};
use serenity::cache::Cache;
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Where slash commands get registered on ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSync {
    Global,
    Guild(u64),
    Off,
}

/// Adapter settings taken from the bot configuration.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub prefix: String,
    pub sync: CommandSync,
    pub statuses: Vec<String>,
    pub status_interval: Duration,
}

struct GuildSnapshot {
    info: GuildInfo,
    author_permissions: Option<PermissionSet>,
    bot_permissions: Option<PermissionSet>,
}

/// Serenity event handler.
pub struct Handler {
    pipeline: Arc<CommandPipeline>,
    interactions: Arc<InteractionController>,
    settings: GatewaySettings,
    shard_manager: Arc<OnceLock<Arc<ShardManager>>>,
    presence_started: AtomicBool,
}

impl Handler {
    pub fn new(
        pipeline: Arc<CommandPipeline>,
        interactions: Arc<InteractionController>,
        settings: GatewaySettings,
        shard_manager: Arc<OnceLock<Arc<ShardManager>>>,
    ) -> Self {
        Self {
            pipeline,
            interactions,
            settings,
            shard_manager,
            presence_started: AtomicBool::new(false),
        }
    }

    async fn run(&self, ctx: &ExecutionContext, out: &dyn Outbox) {
        if let Err(failure) = self.pipeline.handle(ctx, out).await {
            error!(
                command = %ctx.command,
                user = %ctx.author.id,
                "Ignoring exception in command {}: {:#}",
                ctx.command,
                failure
            );
        }
    }

    async fn latency(&self, ctx: &Context) -> Option<Duration> {
        let manager = self.shard_manager.get()?;
        let runners = manager.runners.lock().await;
        runners.get(&ctx.shard_id).and_then(|runner| runner.latency)
    }

    async fn sync_commands(&self, ctx: &Context) {
        let commands: Vec<CreateCommand> = self
            .pipeline
            .registry()
            .catalog()
            .map(convert::command_definition)
            .collect();
        let count = commands.len();

        let result = match self.settings.sync {
            CommandSync::Off => return,
            CommandSync::Guild(id) => {
                info!(guild_id = id, "Syncing commands to guild...");
                GuildId::new(id).set_commands(&ctx.http, commands).await
            }
            CommandSync::Global => {
                info!("Syncing commands globally...");
                Command::set_global_commands(&ctx.http, commands).await
            }
        };

        match result {
            Ok(_) => info!(count, "Slash commands registered"),
            Err(e) => warn!("Failed to register slash commands: {}", e),
        }
    }

    async fn on_message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let bot_id = ctx.cache.current_user().id;
        let Some(invocation) = parse_text_invocation(
            &msg.content,
            &self.settings.prefix,
            Some(bot_core::UserId(bot_id.get())),
        ) else {
            return;
        };

        let mut author = convert::user_profile(&msg.author);
        if let Some(member) = &msg.member {
            convert::apply_membership(&mut author, member.joined_at, &member.roles);
        }

        let mut context = ExecutionContext::new(
            author,
            bot_core::ChannelId(msg.channel_id.get()),
            invocation.command,
            RawArgs::Text(invocation.rest.to_string()),
            Surface::Prefix,
        );
        if let Some(guild_id) = msg.guild_id {
            let snapshot = guild_snapshot(&ctx.cache, guild_id, msg.channel_id, msg.author.id, bot_id);
            context.guild = Some(snapshot.info);
            context.author_permissions = snapshot.author_permissions;
            context.bot_permissions = snapshot.bot_permissions;
        }
        context.latency = self.latency(&ctx).await;

        let out = ChannelOutbox::new(ctx.http.clone(), msg.channel_id);
        self.run(&context, &out).await;
    }

    async fn on_command(&self, ctx: Context, command: CommandInteraction) {
        let mut author = convert::user_profile(&command.user);
        if let Some(member) = &command.member {
            convert::apply_membership(&mut author, member.joined_at, &member.roles);
        }

        let mut context = ExecutionContext::new(
            author,
            bot_core::ChannelId(command.channel_id.get()),
            command.data.name.clone(),
            convert::named_options(&command.data.options),
            Surface::Slash,
        );
        if let Some(guild_id) = command.guild_id {
            let bot_id = ctx.cache.current_user().id;
            let snapshot = guild_snapshot(&ctx.cache, guild_id, command.channel_id, command.user.id, bot_id);
            context.guild = Some(snapshot.info);
            context.author_permissions = command
                .member
                .as_ref()
                .and_then(|m| m.permissions)
                .map(convert::permission_set)
                .or(snapshot.author_permissions);
            context.bot_permissions = command
                .app_permissions
                .map(convert::permission_set)
                .or(snapshot.bot_permissions);
        }
        context.latency = self.latency(&ctx).await;

        let out = InteractionOutbox::new(ctx.http.clone(), command);
        self.run(&context, &out).await;
    }

    async fn on_component(&self, ctx: Context, component: ComponentInteraction) {
        // Acknowledge first, even for unknown or finished sessions.
        if let Err(e) = component
            .create_response(&ctx.http, CreateInteractionResponse::Acknowledge)
            .await
        {
            warn!("Failed to acknowledge component interaction: {}", e);
        }

        let values = match &component.data.kind {
            ComponentInteractionDataKind::StringSelect { values } => values.clone(),
            _ => Vec::new(),
        };
        let event = ComponentEvent {
            custom_id: component.data.custom_id.clone(),
            values,
            user: bot_core::UserId(component.user.id.get()),
        };
        let outcome = self.interactions.route(&event);
        debug!(custom_id = %event.custom_id, ?outcome, "Component event routed");
    }
}

/// Guild details and cached permissions. Reads the cache without awaiting.
fn guild_snapshot(
    cache: &Cache,
    guild_id: GuildId,
    channel_id: ChannelId,
    author: UserId,
    bot: UserId,
) -> GuildSnapshot {
    let Some(guild) = cache.guild(guild_id) else {
        return GuildSnapshot {
            info: GuildInfo {
                id: bot_core::GuildId(guild_id.get()),
                name: "Unknown".to_string(),
                icon_url: None,
                created_at: convert::to_utc(guild_id.created_at()),
                member_count: 0,
                online_count: 0,
                boosters: 0,
            },
            author_permissions: None,
            bot_permissions: None,
        };
    };

    let online_count = guild
        .presences
        .values()
        .filter(|p| p.status != OnlineStatus::Offline)
        .count() as u64;
    let info = GuildInfo {
        id: bot_core::GuildId(guild.id.get()),
        name: guild.name.clone(),
        icon_url: guild.icon_url(),
        created_at: convert::to_utc(guild.id.created_at()),
        member_count: guild.member_count,
        online_count,
        boosters: guild.premium_subscription_count.unwrap_or(0),
    };

    let channel = guild.channels.get(&channel_id);
    let permissions_of = |user: UserId| {
        let member = guild.members.get(&user)?;
        let channel = channel?;
        Some(convert::permission_set(guild.user_permissions_in(channel, member)))
    };

    GuildSnapshot {
        author_permissions: permissions_of(author),
        bot_permissions: permissions_of(bot),
        info,
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {}", ready.user.name);
        info!("Bot version: {}", env!("CARGO_PKG_VERSION"));
        info!(
            "Running on: {} {}",
            std::env::consts::OS,
            std::env::consts::ARCH
        );

        self.sync_commands(&ctx).await;

        if !self.presence_started.swap(true, Ordering::SeqCst) {
            presence::spawn_rotation(
                ctx.clone(),
                self.settings.statuses.clone(),
                self.settings.status_interval,
            );
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        self.on_message(ctx, msg).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => self.on_command(ctx, command).await,
            Interaction::Component(component) => self.on_component(ctx, component).await,
            _ => {}
        }
    }
}
