//! # Help Text
//!
//! Command reference displayed to the user via the `help` command.

const COMMANDS: &str = concat!(
    "**🔑 Access**\n",
    "* a|access config <token> [url]: Set the room's GitLab token and URL\n",
    "\n",
    "**📂 Projects**\n",
    "* p|project list [all]: Your projects (or every visible one)\n",
    "* p|project search <term>\n",
    "* p|project set <id>: Set the room's default project\n",
    "\n",
    "**📝 Issues**\n",
    "* i|issue list [all|opened|closed]\n",
    "* i|issue create <title>, description on the following lines\n",
    "* i|issue assign <id> <username>\n",
    "* i|issue close|reopen|remove <id>\n",
    "\n",
    "**🔨 CI**\n",
    "* b|build list [created|pending|running|failed|success|canceled|skipped]\n",
    "* b|build play|retry|erase <id>\n",
    "* pi|pipeline list\n",
    "* d|deployment list\n",
    "\n",
    "**⚡ Misc**\n",
    "* m|milestone list [project_id] [all|opened|closed]\n",
    "* u|user list\n",
    "* h|help\n"
);

pub fn usage(bot: &str) -> String {
    format!("**🤖 GitLab Help**\nUse: {bot} command _args_\n\n{COMMANDS}")
}
