//! Command registry: name → handler, plus the pre-execution checks.

use crate::args::{bind, Arguments, ParamSpec};
use crate::context::ExecutionContext;
use crate::cooldown::Cooldowns;
use crate::failure::{CommandResult, FailureRecord};
use crate::gateway::Outbox;
use crate::guard::Guard;
use crate::types::{Permission, UserId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Everything a handler body gets to work with.
pub struct Invocation<'a> {
    pub ctx: &'a ExecutionContext,
    pub args: Arguments,
    pub out: &'a dyn Outbox,
    pub registry: &'a CommandRegistry,
}

/// Command handler trait. One body serves both invocation surfaces.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult;
}

/// Metadata and checks for a registered command.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    pub category: String,
    pub params: Vec<ParamSpec>,
    pub cooldown: Option<Duration>,
    pub owner_only: bool,
    pub user_permissions: Vec<Permission>,
    pub bot_permissions: Vec<Permission>,
}

impl CommandSpec {
    fn new(name: String, description: String) -> Self {
        Self {
            name,
            description,
            category: "general".into(),
            params: Vec::new(),
            cooldown: None,
            owner_only: false,
            user_permissions: Vec::new(),
            bot_permissions: Vec::new(),
        }
    }

    pub fn category(&mut self, category: impl Into<String>) -> &mut Self {
        self.category = category.into();
        self
    }

    pub fn param(&mut self, param: ParamSpec) -> &mut Self {
        self.params.push(param);
        self
    }

    pub fn cooldown(&mut self, period: Duration) -> &mut Self {
        self.cooldown = Some(period);
        self
    }

    pub fn owner_only(&mut self) -> &mut Self {
        self.owner_only = true;
        self
    }

    pub fn requires(&mut self, permissions: &[Permission]) -> &mut Self {
        self.user_permissions.extend_from_slice(permissions);
        self
    }

    pub fn bot_requires(&mut self, permissions: &[Permission]) -> &mut Self {
        self.bot_permissions.extend_from_slice(permissions);
        self
    }

    /// First line of the description, as listed by `help`.
    pub fn summary(&self) -> &str {
        self.description.lines().next().unwrap_or("")
    }
}

struct Entry {
    spec: CommandSpec,
    handler: Arc<dyn CommandHandler>,
}

/// Registry of commands, built once at startup.
pub struct CommandRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    guard: Guard,
    owners: HashSet<UserId>,
    cooldowns: Cooldowns,
}

impl CommandRegistry {
    pub fn new(guard: Guard, owners: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            guard,
            owners: owners.into_iter().collect(),
            cooldowns: Cooldowns::new(),
        }
    }

    /// Register a command. Re-registering a name replaces the previous entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> &mut CommandSpec {
        let name = name.into();
        let entry = Entry {
            spec: CommandSpec::new(name.clone(), description.into()),
            handler: Arc::new(handler),
        };

        let idx = match self.index.get(&name) {
            Some(&idx) => {
                self.entries[idx] = entry;
                idx
            }
            None => {
                self.entries.push(entry);
                let idx = self.entries.len() - 1;
                self.index.insert(name, idx);
                idx
            }
        };
        &mut self.entries[idx].spec
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.index.get(name).map(|&idx| &self.entries[idx].spec)
    }

    pub fn is_owner(&self, user: UserId) -> bool {
        self.owners.contains(&user)
    }

    /// All commands in registration order.
    pub fn catalog(&self) -> impl Iterator<Item = &CommandSpec> {
        self.entries.iter().map(|e| &e.spec)
    }

    /// Commands grouped by category, categories in first-registration order.
    pub fn by_category(&self) -> Vec<(&str, Vec<&CommandSpec>)> {
        let mut groups: Vec<(&str, Vec<&CommandSpec>)> = Vec::new();
        for spec in self.catalog() {
            match groups.iter_mut().find(|(c, _)| *c == spec.category) {
                Some((_, specs)) => specs.push(spec),
                None => groups.push((spec.category.as_str(), vec![spec])),
            }
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the checks and, if they pass, the handler for `ctx.command`.
    ///
    /// Order: unknown command, guard, owner, user permissions, bot
    /// permissions, cooldown, argument binding, handler body.
    #[instrument(skip_all, fields(command = %ctx.command, user = %ctx.author.id))]
    pub async fn dispatch(&self, ctx: &ExecutionContext, out: &dyn Outbox) -> CommandResult {
        let entry = self
            .index
            .get(&ctx.command)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| FailureRecord::UnknownCommand(ctx.command.clone()))?;
        let spec = &entry.spec;

        self.guard.check(ctx.author.id).await.into_result()?;

        if spec.owner_only && !self.is_owner(ctx.author.id) {
            return Err(FailureRecord::NotOwner);
        }

        if ctx.guild.is_some() {
            if let Some(granted) = &ctx.author_permissions {
                let missing = granted.missing(&spec.user_permissions);
                if !missing.is_empty() {
                    return Err(FailureRecord::MissingPermission(missing));
                }
            }
            if let Some(granted) = &ctx.bot_permissions {
                let missing = granted.missing(&spec.bot_permissions);
                if !missing.is_empty() {
                    return Err(FailureRecord::BotMissingPermission(missing));
                }
            }
        }

        if let Some(period) = spec.cooldown {
            if let Some(retry_after) = self.cooldowns.hit(&spec.name, ctx.author.id, period) {
                return Err(FailureRecord::Cooldown { retry_after });
            }
        }

        let args = bind(&spec.params, &ctx.args)?;
        debug!(args = args.len(), "Arguments bound");

        let invocation = Invocation {
            ctx,
            args,
            out,
            registry: self,
        };
        entry.handler.execute(&invocation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{RawArgs, Surface};
    use crate::embed::Reply;
    use crate::gateway::{OutboxError, SentMessage};
    use crate::guard::Blacklist;
    use crate::types::{ChannelId, GuildId, GuildInfo, PermissionSet, UserProfile};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoBlacklist;

    #[async_trait]
    impl Blacklist for NoBlacklist {
        async fn contains(&self, _user: UserId) -> bool {
            false
        }
    }

    struct DenyAll;

    #[async_trait]
    impl Blacklist for DenyAll {
        async fn contains(&self, _user: UserId) -> bool {
            true
        }
    }

    struct NullOutbox;

    #[async_trait]
    impl Outbox for NullOutbox {
        async fn send(&self, _reply: Reply) -> Result<SentMessage, OutboxError> {
            Ok(SentMessage::Original)
        }

        async fn edit(&self, _message: &SentMessage, _reply: Reply) -> Result<(), OutboxError> {
            Ok(())
        }

        async fn send_direct(&self, _user: UserId, _reply: Reply) -> Result<(), OutboxError> {
            Ok(())
        }

        async fn lookup_user(
            &self,
            _guild: Option<GuildId>,
            _user: UserId,
        ) -> Result<Option<UserProfile>, OutboxError> {
            Ok(None)
        }
    }

    #[derive(Clone, Default)]
    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommandHandler for Counting {
        async fn execute(&self, invocation: &Invocation<'_>) -> CommandResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(invocation.registry.get(&invocation.ctx.command).is_some());
            Ok(())
        }
    }

    fn context(command: &str, args: &str) -> ExecutionContext {
        let author = UserProfile::new(UserId(1), "tester", chrono::Utc::now());
        ExecutionContext::new(
            author,
            ChannelId(10),
            command,
            RawArgs::Text(args.into()),
            Surface::Prefix,
        )
    }

    fn guild() -> GuildInfo {
        GuildInfo {
            id: GuildId(3),
            name: "Shelter".into(),
            icon_url: None,
            created_at: chrono::Utc::now(),
            member_count: 10,
            online_count: 4,
            boosters: 0,
        }
    }

    fn registry(blacklist: Arc<dyn Blacklist>) -> CommandRegistry {
        CommandRegistry::new(Guard::new(blacklist), [UserId(500)])
    }

    #[tokio::test]
    async fn test_dispatch_runs_handler() {
        let handler = Counting::default();
        let mut reg = registry(Arc::new(NoBlacklist));
        reg.register("ping", "Check if the bot is alive.", handler.clone());

        reg.dispatch(&context("ping", ""), &NullOutbox).await.unwrap();
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let reg = registry(Arc::new(DenyAll));
        let err = reg.dispatch(&context("nope", ""), &NullOutbox).await.unwrap_err();
        // Unknown names are rejected before the guard runs.
        assert!(matches!(err, FailureRecord::UnknownCommand(ref name) if name == "nope"));
    }

    #[tokio::test]
    async fn test_guard_runs_before_handler() {
        let handler = Counting::default();
        let mut reg = registry(Arc::new(DenyAll));
        reg.register("ping", "Check if the bot is alive.", handler.clone());

        let err = reg.dispatch(&context("ping", ""), &NullOutbox).await.unwrap_err();
        assert!(matches!(err, FailureRecord::Blacklisted));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_argument_before_handler() {
        let handler = Counting::default();
        let mut reg = registry(Arc::new(NoBlacklist));
        reg.register("8ball", "Ask any question to the bot.", handler.clone())
            .param(ParamSpec::string("question", "The question you want to ask.").rest());

        let err = reg.dispatch(&context("8ball", ""), &NullOutbox).await.unwrap_err();
        assert!(matches!(err, FailureRecord::MissingArgument(ref n) if n == "question"));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_owner_only() {
        let handler = Counting::default();
        let mut reg = registry(Arc::new(NoBlacklist));
        reg.register("reload", "Reload things.", handler.clone()).owner_only();

        let err = reg.dispatch(&context("reload", ""), &NullOutbox).await.unwrap_err();
        assert!(matches!(err, FailureRecord::NotOwner));

        let mut owner_ctx = context("reload", "");
        owner_ctx.author.id = UserId(500);
        reg.dispatch(&owner_ctx, &NullOutbox).await.unwrap();
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_permissions_checked_in_guilds() {
        let mut reg = registry(Arc::new(NoBlacklist));
        reg.register("purge", "Delete messages.", Counting::default())
            .requires(&[Permission::ManageMessages])
            .bot_requires(&[Permission::ManageMessages, Permission::EmbedLinks]);

        let mut ctx = context("purge", "").with_guild(guild());
        ctx.author_permissions = Some(PermissionSet::new());
        let err = reg.dispatch(&ctx, &NullOutbox).await.unwrap_err();
        assert!(matches!(err, FailureRecord::MissingPermission(ref p) if p == &[Permission::ManageMessages]));

        ctx.author_permissions = Some([Permission::Administrator].into_iter().collect());
        ctx.bot_permissions = Some([Permission::EmbedLinks].into_iter().collect());
        let err = reg.dispatch(&ctx, &NullOutbox).await.unwrap_err();
        assert!(matches!(err, FailureRecord::BotMissingPermission(ref p) if p == &[Permission::ManageMessages]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown() {
        let mut reg = registry(Arc::new(NoBlacklist));
        reg.register("dog", "Get a dog image.", Counting::default())
            .cooldown(Duration::from_secs(3));

        reg.dispatch(&context("dog", ""), &NullOutbox).await.unwrap();
        let err = reg.dispatch(&context("dog", ""), &NullOutbox).await.unwrap_err();
        assert!(matches!(err, FailureRecord::Cooldown { retry_after } if retry_after == Duration::from_secs(3)));
    }

    #[test]
    fn test_by_category_keeps_registration_order() {
        let mut reg = registry(Arc::new(NoBlacklist));
        reg.register("help", "List all commands.", Counting::default());
        reg.register("dog", "Get a dog image.", Counting::default()).category("fun");
        reg.register("ping", "Check if the bot is alive.", Counting::default());

        let groups = reg.by_category();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "general");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "fun");
    }

    #[test]
    fn test_reregister_replaces() {
        let mut reg = registry(Arc::new(NoBlacklist));
        reg.register("ping", "old", Counting::default());
        reg.register("ping", "new", Counting::default());
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("ping").unwrap().description, "new");
    }
}
