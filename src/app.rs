use anyhow::Result;

use crate::{
    api,
    cli::{Cli, Command, GroupsCommand, ResourcesCommand},
    domain::{
        self,
        conversation::Conversation,
        events::SessionEvent,
        identity::Identity,
        message::{ChannelRef, Message},
    },
    infra,
    usecases::{
        self,
        bootstrap::{bootstrap, Bootstrapped},
        context::AppContext,
        conversation::{load_conversation, send_message, MessageDraft},
        directory, library,
        library::ResourcePatch,
        session::{self, RegistrationProfile, RestoreOutcome, SessionOutcome},
        upload::{upload_attachment, UploadRequest},
    },
};

pub fn run(cli: Cli) -> Result<()> {
    let Bootstrapped {
        context,
        log_guard: _log_guard,
    } = bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        domain = domain::module_name(),
        infra = infra::module_name(),
        api = api::module_name(),
        usecases = usecases::module_name(),
        "module boundaries loaded"
    );

    // Cross-cutting teardown notice: whichever call hits an unauthorized
    // response, the user ends up pointed back at login.
    context.session.subscribe(|event| {
        if matches!(event, SessionEvent::Expired) {
            eprintln!("Session expired. Run `rcc login` to authenticate again.");
        }
    });

    match cli.command {
        Command::Login { email } => run_login(&context, &email),
        Command::Register {
            email,
            username,
            full_name,
        } => run_register(&context, email, username, full_name),
        Command::Logout => run_logout(&context),
        Command::Whoami => run_whoami(&context),
        Command::Resources { command } => run_resources(&context, command),
        Command::Groups { command } => run_groups(&context, command),
        Command::Users => run_users(&context),
        Command::Chat {
            group_id,
            send,
            file,
        } => run_conversation(&context, ChannelRef::Group { group_id }, send, file),
        Command::Dm {
            peer_id,
            send,
            file,
        } => run_conversation(&context, ChannelRef::Direct { peer_id }, send, file),
    }
}

fn run_login(context: &AppContext, email: &str) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;

    match session::login(
        &context.api,
        &context.session,
        &context.config.session,
        email,
        &password,
    )? {
        SessionOutcome::Verified(identity) => {
            println!("Logged in as {}.", identity.username);
        }
        SessionOutcome::Degraded(identity) => {
            println!(
                "OFFLINE DEMO session as {} — the backend was unreachable. \
                 Nothing is persisted and no data will load.",
                identity.username
            );
        }
    }

    Ok(())
}

fn run_register(
    context: &AppContext,
    email: String,
    username: String,
    full_name: String,
) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;
    let profile = RegistrationProfile {
        email,
        username,
        password,
        full_name,
    };

    match session::register(&context.api, &context.session, &context.config.session, &profile)? {
        SessionOutcome::Verified(identity) => {
            println!("Registered and logged in as {}.", identity.username);
        }
        SessionOutcome::Degraded(identity) => {
            println!(
                "OFFLINE DEMO session as {} — the backend was unreachable. \
                 The account was NOT created.",
                identity.username
            );
        }
    }

    Ok(())
}

fn run_logout(context: &AppContext) -> Result<()> {
    let outcome = session::logout(&context.session)?;
    tracing::info!(token_removed = outcome.token_removed, "logout completed");
    println!("Logged out. Stored credential removed.");
    Ok(())
}

fn run_whoami(context: &AppContext) -> Result<()> {
    let identity = require_identity(context)?;
    println!("{} <{}> — {}", identity.username, identity.email, identity.full_name);
    Ok(())
}

fn run_resources(context: &AppContext, command: ResourcesCommand) -> Result<()> {
    let _identity = require_identity(context)?;

    match command {
        ResourcesCommand::List => {
            let resources = library::list_resources(&context.api)?;
            if resources.is_empty() {
                println!("The library is empty.");
            }
            for resource in resources {
                println!(
                    "#{} {} [{}] {} — by {}, {} downloads",
                    resource.id,
                    resource.title,
                    resource.category,
                    resource.display_size(),
                    resource.uploader,
                    resource.download_count
                );
                if !resource.description.is_empty() {
                    println!("    {}", resource.description);
                }
            }
        }
        ResourcesCommand::Upload {
            file,
            title,
            description,
            category,
        } => {
            let reference = upload_attachment(
                &context.api,
                &UploadRequest {
                    path: file,
                    title,
                    description,
                    category,
                },
            )?;
            println!("Uploaded as resource #{} ({}).", reference.resource_id, reference.title);
        }
        ResourcesCommand::Edit {
            id,
            title,
            description,
            category,
        } => {
            library::edit_resource(
                &context.api,
                id,
                &ResourcePatch {
                    title,
                    description,
                    category,
                },
            )?;
            println!("Resource #{id} updated.");
        }
        ResourcesCommand::Delete { id } => {
            library::delete_resource(&context.api, id)?;
            println!("Resource #{id} deleted.");
        }
    }

    Ok(())
}

fn run_groups(context: &AppContext, command: GroupsCommand) -> Result<()> {
    let _identity = require_identity(context)?;

    match command {
        GroupsCommand::List => {
            let groups = directory::list_groups(&context.api)?;
            if groups.is_empty() {
                println!("No study groups yet.");
            }
            for group in groups {
                println!(
                    "#{} {} [{}] — {} members, created by {}",
                    group.id, group.name, group.category, group.member_count, group.created_by
                );
            }
        }
        GroupsCommand::Create {
            name,
            description,
            category,
        } => {
            let created = directory::create_group(&context.api, &name, &description, &category)?;
            println!("Created group #{} ({}).", created.id, created.name);
        }
    }

    Ok(())
}

fn run_users(context: &AppContext) -> Result<()> {
    let identity = require_identity(context)?;
    let peers = directory::list_peers(&context.api, &identity)?;

    if peers.is_empty() {
        println!("No other users yet.");
    }
    for peer in peers {
        println!("#{} {} — {}", peer.id, peer.display_line(), peer.full_name);
    }

    Ok(())
}

fn run_conversation(
    context: &AppContext,
    channel: ChannelRef,
    send: Option<String>,
    file: Option<std::path::PathBuf>,
) -> Result<()> {
    let identity = require_identity(context)?;

    let mut conversation = Conversation::default();
    conversation.subscribe(|event| tracing::debug!(event = ?event, "conversation event"));
    load_conversation(&context.api, &identity, &mut conversation, channel)?;

    if let Some(group) = conversation.group() {
        println!("{} — {} members", group.name, group.member_count);
        if !group.description.is_empty() {
            println!("{}", group.description);
        }
        println!();
    }

    if conversation.messages().is_empty() {
        println!("No messages in {} yet.", channel.describe());
    }
    for message in conversation.messages() {
        println!("{}", format_message_line(message));
    }

    if send.is_some() || file.is_some() {
        let draft = MessageDraft {
            text: send.unwrap_or_default(),
            file: file.map(UploadRequest::chat_attachment),
        };

        let message = send_message(
            &context.api,
            &context.api,
            &mut conversation,
            &identity,
            &draft,
        )?;
        println!("{}", format_message_line(&message));
        println!("Sent (message #{}).", message.id);
    }

    Ok(())
}

fn require_identity(context: &AppContext) -> Result<Identity> {
    match session::restore_session(&context.api, &context.session)? {
        RestoreOutcome::Restored(identity) => Ok(identity),
        RestoreOutcome::Anonymous => {
            for line in anonymous_guidance_lines() {
                eprintln!("{line}");
            }
            anyhow::bail!("no active session")
        }
        RestoreOutcome::Invalidated => {
            eprintln!("The stored session is no longer valid and has been cleared.");
            anyhow::bail!("session could not be restored")
        }
    }
}

fn format_message_line(message: &Message) -> String {
    format!(
        "[{}] {}: {}",
        message.created_at.format("%Y-%m-%d %H:%M"),
        message.sender_username,
        message.display_content()
    )
}

fn anonymous_guidance_lines() -> [&'static str; 2] {
    [
        "You are not logged in.",
        "Run `rcc login --email <email>` or `rcc register` to get started.",
    ]
}
