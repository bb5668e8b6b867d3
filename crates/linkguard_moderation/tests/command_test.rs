//! Tests for operator commands.

use linkguard_cache::MembershipObserver;
use linkguard_core::{
    Capability, ChatId, ChatKind, ChatMember, InboundMessage, MessageId, PROMOTION_GRANTS,
    UserId, UserProfile,
};
use linkguard_error::PlatformErrorKind;
use linkguard_interface::{MockPlatform, PlatformCall};
use linkguard_moderation::{
    CommandErrorKind, CommandHandler, CommandReply, ModerationContext, ParsedCommand,
    PromotionOutcome, WhitelistEntry,
};
use linkguard_security::SecurityErrorKind;
use linkguard_storage::{ExemptionMap, ExemptionStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const CHAT: ChatId = ChatId::new(-1001);
const OWNER: UserId = UserId::new(1);
const ADMIN: UserId = UserId::new(2);
const MEMBER: UserId = UserId::new(3);
const SPAMMER: UserId = UserId::new(4);
const AGENT: UserId = UserId::new(900);

struct Harness {
    platform: Arc<MockPlatform>,
    ctx: ModerationContext<MockPlatform>,
    handler: CommandHandler<MockPlatform>,
    path: PathBuf,
    _dir: TempDir,
}

fn harness() -> Harness {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("whitelist.json");
    let platform = Arc::new(MockPlatform::new(AGENT));
    platform.add_member(CHAT, ChatMember::administrator(ADMIN, []));
    platform.add_member(
        CHAT,
        ChatMember::administrator(
            AGENT,
            [
                Capability::DeleteMessages,
                Capability::RestrictMembers,
                Capability::PromoteMembers,
            ],
        ),
    );
    platform.add_user(UserProfile {
        id: SPAMMER,
        username: Some("spammer".to_string()),
        first_name: Some("Sam".to_string()),
        is_bot: false,
    });
    let store = ExemptionStore::with_entries(path.clone(), OWNER, ExemptionMap::new());
    let ctx = ModerationContext::new(
        Arc::clone(&platform),
        Arc::new(store),
        Arc::new(MembershipObserver::new()),
    );
    let handler = CommandHandler::new(ctx.clone());
    Harness {
        platform,
        ctx,
        handler,
        path,
        _dir: dir,
    }
}

fn command(from: UserId, text: &str) -> (InboundMessage, ParsedCommand) {
    let message = InboundMessage::new(CHAT, ChatKind::Supergroup, MessageId::new(77))
        .with_author(from)
        .with_text(text);
    let parsed = ParsedCommand::parse(text).expect("Not a command");
    (message, parsed)
}

#[tokio::test]
async fn test_kill_on_owner_is_rejected_before_any_ban() {
    let h = harness();
    let (message, parsed) = command(ADMIN, "/kill 1");

    let err = h.handler.handle(&message, &parsed).await.expect_err("Should reject");

    assert_eq!(err.kind, CommandErrorKind::InvalidTarget(OWNER));
    assert!(h.platform.ban_attempts().is_empty());
}

#[tokio::test]
async fn test_kill_on_agent_is_rejected() {
    let h = harness();
    let (message, parsed) = command(OWNER, "/kill 900");

    let err = h.handler.handle(&message, &parsed).await.expect_err("Should reject");

    assert_eq!(err.kind, CommandErrorKind::InvalidTarget(AGENT));
    assert!(h.platform.ban_attempts().is_empty());
}

#[tokio::test]
async fn test_kill_by_member_is_unauthorized() {
    let h = harness();
    let (message, parsed) = command(MEMBER, "/kill 4");

    let err = h.handler.handle(&message, &parsed).await.expect_err("Should reject");

    assert!(err.is_unauthorized());
    assert_eq!(
        err.kind,
        CommandErrorKind::Unauthorized(SecurityErrorKind::AdminOnly {
            command: "kill".to_string()
        })
    );
    assert!(h.platform.ban_attempts().is_empty());
}

#[tokio::test]
async fn test_kill_resolves_handles_and_bans() {
    let h = harness();
    h.ctx.observer.observe(CHAT, SPAMMER);
    let (message, parsed) = command(ADMIN, "/kill @spammer");

    let reply = h.handler.handle(&message, &parsed).await.expect("Kill failed");

    assert_eq!(reply, CommandReply::Killed { user: SPAMMER });
    assert_eq!(h.platform.ban_attempts(), vec![SPAMMER]);
    assert!(!h.ctx.observer.contains(CHAT, SPAMMER));
}

#[tokio::test]
async fn test_kill_prefers_the_replied_author() {
    let h = harness();
    let (message, parsed) = command(OWNER, "/kill 12345");
    let message = message.with_reply_to_author(SPAMMER);

    h.handler.handle(&message, &parsed).await.expect("Kill failed");

    assert_eq!(h.platform.ban_attempts(), vec![SPAMMER]);
}

#[tokio::test]
async fn test_kill_accepts_profile_urls() {
    let h = harness();
    let (message, parsed) = command(OWNER, "/kill https://t.me/spammer");

    h.handler.handle(&message, &parsed).await.expect("Kill failed");

    assert!(
        h.platform
            .calls()
            .contains(&PlatformCall::ResolveUserByHandle("@spammer".to_string()))
    );
    assert_eq!(h.platform.ban_attempts(), vec![SPAMMER]);
}

#[tokio::test]
async fn test_kill_without_target_reports_usage() {
    let h = harness();
    let (message, parsed) = command(OWNER, "/kill");

    let err = h.handler.handle(&message, &parsed).await.expect_err("Should reject");

    assert!(matches!(err.kind, CommandErrorKind::MissingTarget { .. }));
    assert!(err.reply_text().starts_with("Usage: /kill"));
}

#[tokio::test]
async fn test_kill_unknown_handle() {
    let h = harness();
    let (message, parsed) = command(OWNER, "/kill @nobody");

    let err = h.handler.handle(&message, &parsed).await.expect_err("Should reject");

    assert_eq!(
        err.kind,
        CommandErrorKind::TargetNotFound {
            reference: "@nobody".to_string(),
            reason: PlatformErrorKind::NotFound("@nobody".to_string()),
        }
    );
    assert!(h.platform.ban_attempts().is_empty());
}

#[tokio::test]
async fn test_kill_needs_the_restrict_right() {
    let h = harness();
    h.platform.add_member(
        CHAT,
        ChatMember::administrator(AGENT, [Capability::DeleteMessages]),
    );
    let (message, parsed) = command(OWNER, "/kill 4");

    let err = h.handler.handle(&message, &parsed).await.expect_err("Should reject");

    assert_eq!(
        err.kind,
        CommandErrorKind::MissingCapability(Capability::RestrictMembers)
    );
    assert!(h.platform.ban_attempts().is_empty());
}

#[tokio::test]
async fn test_kill_reports_refused_ban() {
    let h = harness();
    h.platform
        .fail_ban(SPAMMER, PlatformErrorKind::PermissionDenied("creator".to_string()));
    let (message, parsed) = command(OWNER, "/kill 4");

    let err = h.handler.handle(&message, &parsed).await.expect_err("Should fail");

    assert!(matches!(err.kind, CommandErrorKind::ActionFailed { .. }));
}

#[tokio::test]
async fn test_op_is_owner_only_and_checked_locally() {
    let h = harness();
    let (message, parsed) = command(ADMIN, "/op 4");

    let err = h.handler.handle(&message, &parsed).await.expect_err("Should reject");

    assert_eq!(
        err.kind,
        CommandErrorKind::Unauthorized(SecurityErrorKind::OwnerOnly {
            command: "op".to_string()
        })
    );
    assert!(h.platform.calls().is_empty());
    assert!(h.ctx.exemptions.list(CHAT).is_empty());
}

#[tokio::test]
async fn test_op_on_agent_or_owner_is_rejected() {
    let h = harness();

    for (text, target) in [("/op 900", AGENT), ("/op 1", OWNER)] {
        let (message, parsed) = command(OWNER, text);
        let err = h.handler.handle(&message, &parsed).await.expect_err("Should reject");
        assert_eq!(err.kind, CommandErrorKind::InvalidTarget(target));
    }

    assert!(h.ctx.exemptions.list(CHAT).is_empty());
    assert!(
        !h.platform
            .calls()
            .iter()
            .any(|call| matches!(call, PlatformCall::PromoteChatMember(..)))
    );
}

#[tokio::test]
async fn test_op_exempts_persists_and_promotes() {
    let h = harness();
    let (message, parsed) = command(OWNER, "/op @spammer");

    let reply = h.handler.handle(&message, &parsed).await.expect("Op failed");

    assert_eq!(
        reply,
        CommandReply::Opped {
            user: SPAMMER,
            newly_exempted: true,
            promotion: PromotionOutcome::Promoted,
        }
    );
    assert!(h.ctx.exemptions.is_exempt(CHAT, SPAMMER));
    assert!(
        h.platform
            .calls()
            .contains(&PlatformCall::PromoteChatMember(CHAT, SPAMMER, PROMOTION_GRANTS.to_vec()))
    );

    let reloaded = ExemptionStore::open(&h.path, OWNER).await;
    assert!(reloaded.is_exempt(CHAT, SPAMMER));
}

#[tokio::test]
async fn test_op_keeps_exemption_when_promotion_fails() {
    let h = harness();
    h.platform
        .fail_promotions(PlatformErrorKind::PermissionDenied("no promote right".to_string()));
    let (message, parsed) = command(OWNER, "/op 4");

    let reply = h.handler.handle(&message, &parsed).await.expect("Op failed");

    assert_eq!(
        reply,
        CommandReply::Opped {
            user: SPAMMER,
            newly_exempted: true,
            promotion: PromotionOutcome::Failed(PlatformErrorKind::PermissionDenied(
                "no promote right".to_string()
            )),
        }
    );
    assert!(h.ctx.exemptions.is_exempt(CHAT, SPAMMER));
    assert!(reply.to_string().contains("promotion failed"));
}

#[tokio::test]
async fn test_unop_revokes() {
    let h = harness();
    h.ctx.exemptions.add(CHAT, SPAMMER).await;
    let (message, parsed) = command(OWNER, "/unop 4");

    let reply = h.handler.handle(&message, &parsed).await.expect("Unop failed");

    assert_eq!(
        reply,
        CommandReply::Unopped {
            user: SPAMMER,
            removed: true
        }
    );
    assert!(!h.ctx.exemptions.is_exempt(CHAT, SPAMMER));
}

#[tokio::test]
async fn test_whitelist_lists_names_when_known() {
    let h = harness();
    h.ctx.exemptions.add(CHAT, SPAMMER).await;
    h.ctx.exemptions.add(CHAT, UserId::new(8)).await;
    let (message, parsed) = command(ADMIN, "/whitelist");

    let reply = h.handler.handle(&message, &parsed).await.expect("Listing failed");

    assert_eq!(
        reply,
        CommandReply::Whitelist(vec![
            WhitelistEntry {
                user: SPAMMER,
                name: Some("Sam".to_string()),
            },
            WhitelistEntry {
                user: UserId::new(8),
                name: None,
            },
        ])
    );
    assert_eq!(reply.to_string(), "Whitelisted users:\n- Sam (4)\n- 8");
}

#[tokio::test]
async fn test_whitelist_by_member_is_unauthorized() {
    let h = harness();
    let (message, parsed) = command(MEMBER, "/whitelist");

    let err = h.handler.handle(&message, &parsed).await.expect_err("Should reject");

    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_yo_runs_the_sweep() {
    let h = harness();
    h.ctx.observer.observe(CHAT, SPAMMER);
    h.ctx.observer.observe(CHAT, ADMIN);
    let (message, parsed) = command(OWNER, "/yo");

    let reply = h.handler.handle(&message, &parsed).await.expect("Sweep failed");

    assert_eq!(reply.to_string(), "Banned 1 members.");
    assert_eq!(h.platform.ban_attempts(), vec![SPAMMER]);
}

#[tokio::test]
async fn test_commands_addressed_to_other_bots_are_not_accepted() {
    let h = harness();
    h.platform.set_agent(UserProfile {
        id: AGENT,
        username: Some("LinkGuardBot".to_string()),
        first_name: None,
        is_bot: true,
    });
    h.ctx.observer.observe(CHAT, SPAMMER);

    let (_, foreign) = command(OWNER, "/yo@SomeOtherBot");
    assert!(!h.handler.accepts(&foreign).await);

    let (_, plain) = command(OWNER, "/yo");
    assert!(h.handler.accepts(&plain).await);

    let (message, own) = command(OWNER, "/yo@linkguardbot");
    assert!(h.handler.accepts(&own).await);
    let reply = h.handler.handle(&message, &own).await.expect("Sweep failed");
    assert_eq!(reply.to_string(), "Banned 1 members.");
    assert_eq!(h.platform.ban_attempts(), vec![SPAMMER]);
}

#[tokio::test]
async fn test_suffixed_commands_are_refused_while_the_agent_has_no_handle() {
    let h = harness();
    let (_, parsed) = command(OWNER, "/yo@LinkGuardBot");

    assert!(!h.handler.accepts(&parsed).await);
}

#[tokio::test]
async fn test_yo_is_owner_only() {
    let h = harness();
    h.ctx.observer.observe(CHAT, SPAMMER);
    let (message, parsed) = command(ADMIN, "/yo");

    let err = h.handler.handle(&message, &parsed).await.expect_err("Should reject");

    assert!(err.is_unauthorized());
    assert!(h.ctx.observer.contains(CHAT, SPAMMER));
}
