use family_tree::types::{Gender, Member, NewMember, NewRelationship, Relationship};

use super::TestHarness;

/// A small three-generation family seeded straight into the backend.
///
/// ```text
///   grandpa ── spouse ── grandma
///          \           /
///           parent  parent
///              \     /
///               father ── spouse ── mother
///                     \
///                      parent
///                        \
///                        child
/// ```
pub struct Family {
    pub grandpa: Member,
    pub grandma: Member,
    pub father: Member,
    pub mother: Member,
    pub child: Member,
    pub edges: Vec<Relationship>,
}

pub fn seed_family(harness: &TestHarness) -> Family {
    let backend = &harness.backend;

    let grandpa = backend.seed_member(NewMember::new("Nguyen Van Long", 1).with_gender(Gender::Male));
    let grandma = backend.seed_member(NewMember::new("Le Thi Hoa", 1).with_gender(Gender::Female));
    let father = backend.seed_member(NewMember::new("Nguyen Van Minh", 2).with_gender(Gender::Male));
    let mother = backend.seed_member(NewMember::new("Tran Thi Lan", 2).with_gender(Gender::Female));
    let child = backend.seed_member(NewMember::new("Nguyen Van An", 3));

    let edges = vec![
        backend.seed_relationship(NewRelationship::spouse(&grandpa.id, &grandma.id)),
        backend.seed_relationship(NewRelationship::parent(&grandpa.id, &father.id)),
        backend.seed_relationship(NewRelationship::parent(&grandma.id, &father.id)),
        // Stored with the later-generation member first on purpose
        backend.seed_relationship(NewRelationship::spouse(&mother.id, &father.id)),
        backend.seed_relationship(NewRelationship::parent(&father.id, &child.id)),
    ];

    Family {
        grandpa,
        grandma,
        father,
        mother,
        child,
        edges,
    }
}

pub fn names(members: &[Member]) -> Vec<&str> {
    members.iter().map(|m| m.full_name.as_str()).collect()
}
