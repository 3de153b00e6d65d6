//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! A message must address the bot (`gitbot: issue list`, or `<alias>issue list`);
//! the remainder is matched against the command table in order and the first
//! match wins. Misses are ignored silently.
//!
//! For a match the pipeline is: extract params -> project gate -> credential
//! gate -> one handler -> one reply.

use anyhow::{Context, Result};
use regex::Regex;
use std::sync::Arc;

use crate::application::context::{RoomContextResolver, require_project};
use crate::application::params;
use crate::domain::config::AppConfig;
use crate::domain::error::GitlabError;
use crate::domain::traits::{Brain, ChatProvider, GitlabConnector};
use crate::interface::commands::{self, CommandContext};
use crate::strings::messages;

/// Commands answered without talking to GitLab, plus the GitLab-backed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    AccessConfig,
    Gitlab(GitlabCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitlabCommand {
    ProjectSearch,
    ProjectList,
    ProjectSet,
    UserList,
    MilestoneList,
    BuildList,
    BuildPlay,
    BuildRetry,
    BuildErase,
    IssueList,
    IssueCreate,
    IssueAssign,
    IssueState,
    IssueRemove,
    PipelineList,
    DeploymentList,
}

/// One entry of the command table. `params` name the pattern's capture groups in order.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub pattern: &'static str,
    pub params: &'static [&'static str],
    pub requires_project: bool,
}

const fn command(
    kind: CommandKind,
    pattern: &'static str,
    params: &'static [&'static str],
    requires_project: bool,
) -> CommandSpec {
    CommandSpec {
        kind,
        pattern,
        params,
        requires_project,
    }
}

const fn remote(
    kind: GitlabCommand,
    pattern: &'static str,
    params: &'static [&'static str],
    requires_project: bool,
) -> CommandSpec {
    command(CommandKind::Gitlab(kind), pattern, params, requires_project)
}

/// Registration order is match order.
pub const COMMANDS: &[CommandSpec] = &[
    command(CommandKind::Help, r"h(?:elp)?", &[], false),
    command(
        CommandKind::AccessConfig,
        r"a(?:ccess)? config (\S+)(?:\s+(\S+))?",
        &["token", "url"],
        false,
    ),
    remote(GitlabCommand::ProjectSearch, r"p(?:roject)? search (.+)", &["search", "project"], false),
    remote(GitlabCommand::ProjectList, r"p(?:roject)? list(?:\s+(all))?", &["status", "project"], false),
    remote(GitlabCommand::ProjectSet, r"p(?:roject)? set #?(\d+)", &["project"], false),
    remote(GitlabCommand::UserList, r"u(?:ser)? list", &[], false),
    remote(
        GitlabCommand::MilestoneList,
        r"m(?:ilestone)? list(?:\s+#?(\d+))?(?:\s+(all|opened|closed))?",
        &["project", "status"],
        true,
    ),
    remote(
        GitlabCommand::BuildList,
        r"b(?:uild)? list(?:\s+(created|pending|running|failed|success|canceled|skipped))?",
        &["scope"],
        true,
    ),
    remote(GitlabCommand::BuildPlay, r"b(?:uild)? play #?(\d+)", &["build"], true),
    remote(GitlabCommand::BuildRetry, r"b(?:uild)? retry #?(\d+)", &["build"], true),
    remote(GitlabCommand::BuildErase, r"b(?:uild)? erase #?(\d+)", &["build"], true),
    remote(GitlabCommand::IssueList, r"i(?:ssue)? list(?:\s+(all|opened|closed))?", &["status"], true),
    remote(
        GitlabCommand::IssueCreate,
        r"i(?:ssue)? create[ \t]+([^\n]+)(?:\n([\s\S]*))?",
        &["title", "description"],
        true,
    ),
    remote(
        GitlabCommand::IssueAssign,
        r"i(?:ssue)? assign #?(\d+) @?([\w.\-]+)",
        &["issue", "username"],
        true,
    ),
    remote(GitlabCommand::IssueState, r"i(?:ssue)? (close|reopen) #?(\d+)", &["action", "issue"], true),
    remote(GitlabCommand::IssueRemove, r"i(?:ssue)? (remove) #?(\d+)", &["action", "issue"], true),
    remote(GitlabCommand::PipelineList, r"pi(?:peline)? list", &[], true),
    remote(GitlabCommand::DeploymentList, r"d(?:eployment)? list", &[], true),
];

pub struct CommandRouter {
    config: AppConfig,
    resolver: RoomContextResolver,
    connector: Arc<dyn GitlabConnector>,
    address: Regex,
    commands: Vec<(Regex, CommandSpec)>,
}

impl CommandRouter {
    pub fn new(
        config: AppConfig,
        brain: Arc<dyn Brain>,
        connector: Arc<dyn GitlabConnector>,
    ) -> Result<Self> {
        let resolver = RoomContextResolver::new(brain, &config.services.gitlab);
        let address = address_pattern(&config.bot.name, config.bot.alias.as_deref())?;
        let commands = COMMANDS
            .iter()
            .map(|spec| {
                // Anchored on both ends and case-insensitive.
                Regex::new(&format!(r"(?i)^(?:{})\s*$", spec.pattern))
                    .with_context(|| format!("Invalid pattern for {:?}", spec.kind))
                    .map(|re| (re, *spec))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            resolver,
            connector,
            address,
            commands,
        })
    }

    /// The command text of a message addressed to the bot, or `None`.
    pub fn strip_address<'m>(&self, message: &'m str) -> Option<&'m str> {
        let found = self.address.find(message)?;
        let rest = message[found.end()..].trim();
        (!rest.is_empty()).then_some(rest)
    }

    /// First command whose pattern matches, with its captures in order.
    pub fn match_command<'t>(&self, text: &'t str) -> Option<(&CommandSpec, Vec<Option<&'t str>>)> {
        self.commands.iter().find_map(|(re, spec)| {
            re.captures(text).map(|caps| {
                let captures = caps.iter().skip(1).map(|m| m.map(|m| m.as_str())).collect();
                (spec, captures)
            })
        })
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider,
    {
        let Some(text) = self.strip_address(message) else {
            return Ok(());
        };
        let Some((spec, captures)) = self.match_command(text) else {
            tracing::debug!("No command matches '{}' from {}", text, sender);
            return Ok(());
        };

        let room_id = chat.room_id();
        tracing::info!(
            "Router dispatching {:?} room='{}' sender='{}'",
            spec.kind,
            room_id,
            sender
        );

        let reply = self.dispatch(&room_id, spec, &captures, chat).await;
        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => match e.downcast_ref::<GitlabError>() {
                Some(remote) => {
                    tracing::warn!("{:?} failed in {}: {}", spec.kind, room_id, remote);
                    messages::remote_failed(&remote.to_string())
                }
                None => {
                    tracing::error!("{:?} failed in {}: {:#}", spec.kind, room_id, e);
                    messages::INTERNAL_ERROR.to_string()
                }
            },
        };

        chat.send_message(&reply)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!(e))
    }

    /// Runs the gates and the handler, producing the single reply.
    async fn dispatch<C>(
        &self,
        room_id: &str,
        spec: &CommandSpec,
        captures: &[Option<&str>],
        chat: &C,
    ) -> Result<String>
    where
        C: ChatProvider,
    {
        let bot_name = self.config.bot.display_name();
        let context = self.resolver.resolve(room_id).await?;
        let mut params = params::extract(captures, spec.params, &context)
            .with_limit(self.config.services.gitlab.record_limit);

        if spec.requires_project && require_project(&mut params, &context).is_none() {
            tracing::info!("{:?} rejected in {}: no default project", spec.kind, room_id);
            return Ok(messages::set_project_guidance(bot_name));
        }

        let command = match spec.kind {
            CommandKind::Help => return Ok(commands::help::handle_help(bot_name)),
            CommandKind::AccessConfig => {
                return commands::access::handle_access_config(&self.resolver, room_id, &params)
                    .await;
            }
            CommandKind::Gitlab(command) => command,
        };

        let Some(credentials) = self.resolver.ensure_credentials(&context).await? else {
            tracing::info!("{:?} rejected in {}: no GitLab token", spec.kind, room_id);
            return Ok(messages::access_guidance(bot_name));
        };
        let api = self.connector.connect(&credentials)?;

        let ctx = CommandContext {
            room_id,
            bot_name,
            params: &params,
            api: api.as_ref(),
            resolver: &self.resolver,
        };

        let _ = chat.typing(true).await;
        let result = run_handler(command, &ctx).await;
        let _ = chat.typing(false).await;
        result
    }
}

async fn run_handler(command: GitlabCommand, ctx: &CommandContext<'_>) -> Result<String> {
    use commands::{build, issue, milestone, pipeline, project, user};

    match command {
        GitlabCommand::ProjectSearch => project::handle_project_search(ctx).await,
        GitlabCommand::ProjectList => project::handle_project_list(ctx).await,
        GitlabCommand::ProjectSet => project::handle_project_set(ctx).await,
        GitlabCommand::UserList => user::handle_user_list(ctx).await,
        GitlabCommand::MilestoneList => milestone::handle_milestone_list(ctx).await,
        GitlabCommand::BuildList => build::handle_build_list(ctx).await,
        GitlabCommand::BuildPlay => build::handle_build_play(ctx).await,
        GitlabCommand::BuildRetry => build::handle_build_retry(ctx).await,
        GitlabCommand::BuildErase => build::handle_build_erase(ctx).await,
        GitlabCommand::IssueList => issue::handle_issue_list(ctx).await,
        GitlabCommand::IssueCreate => issue::handle_issue_create(ctx).await,
        GitlabCommand::IssueAssign => issue::handle_issue_assign(ctx).await,
        GitlabCommand::IssueState => issue::handle_issue_state(ctx).await,
        GitlabCommand::IssueRemove => issue::handle_issue_remove(ctx).await,
        GitlabCommand::PipelineList => pipeline::handle_pipeline_list(ctx).await,
        GitlabCommand::DeploymentList => pipeline::handle_deployment_list(ctx).await,
    }
}

/// hubot-style addressing: `@name:`, `name,`, `name ` or the bare alias prefix.
fn address_pattern(name: &str, alias: Option<&str>) -> Result<Regex> {
    let name = format!(r"@?{}[:,]?\s+", regex::escape(name));
    let pattern = match alias.map(str::trim).filter(|a| !a.is_empty()) {
        Some(alias) => format!(r"(?i)^\s*(?:{}|{}\s*)", name, regex::escape(alias)),
        None => format!(r"(?i)^\s*{}", name),
    };
    Regex::new(&pattern).context("Invalid bot name or alias")
}
