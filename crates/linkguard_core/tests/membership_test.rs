use linkguard_core::{Capability, ChatMember, MemberStatus, PROMOTION_GRANTS, UserId};

#[test]
fn creator_holds_promotion_grants() {
    let creator = ChatMember::new(UserId::new(1), MemberStatus::Creator);
    assert!(creator.has_all(PROMOTION_GRANTS.iter()));
}

#[test]
fn administrator_needs_explicit_grants() {
    let partial = ChatMember::administrator(UserId::new(2), [Capability::DeleteMessages]);
    assert!(!partial.has_all(PROMOTION_GRANTS.iter()));

    let full = ChatMember::administrator(UserId::new(3), PROMOTION_GRANTS);
    assert!(full.has_all(PROMOTION_GRANTS.iter()));
}

#[test]
fn privileged_statuses() {
    assert!(MemberStatus::Creator.is_privileged());
    assert!(MemberStatus::Administrator.is_privileged());
    assert!(!MemberStatus::Member.is_privileged());
    assert!(!MemberStatus::Restricted.is_privileged());
    assert!(!MemberStatus::Left.is_privileged());
    assert!(!MemberStatus::Banned.is_privileged());
}

#[test]
fn member_status_parses_platform_names() {
    assert_eq!("administrator".parse::<MemberStatus>().unwrap(), MemberStatus::Administrator);
    assert_eq!(MemberStatus::Creator.to_string(), "creator");
}
