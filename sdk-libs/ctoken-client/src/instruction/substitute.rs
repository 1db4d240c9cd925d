//! Recursive replacement of pubkeys with account-table indices.
//!
//! Generic instruction payloads arrive as a tree of values. Before encoding,
//! every pubkey leaf is swapped for its index in the reference table so the
//! payload only carries one byte per referenced account.

use solana_pubkey::Pubkey;

use crate::instruction::pack_accounts::PackedAccounts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackedValue {
    Identity(Pubkey),
    Index(u8),
    Integer(u64),
    BigInteger(u128),
    Bytes(Vec<u8>),
    List(Vec<PackedValue>),
    Struct(Vec<(String, PackedValue)>),
}

/// Replaces every `Identity` leaf with its packed `Index`, deduplicating
/// through the reference table. All other leaves pass through unchanged.
pub fn substitute_identities(value: PackedValue, accounts: &mut PackedAccounts) -> PackedValue {
    match value {
        PackedValue::Identity(pubkey) => PackedValue::Index(accounts.insert_or_get(pubkey)),
        PackedValue::List(items) => PackedValue::List(
            items
                .into_iter()
                .map(|item| substitute_identities(item, accounts))
                .collect(),
        ),
        PackedValue::Struct(fields) => PackedValue::Struct(
            fields
                .into_iter()
                .map(|(name, field)| (name, substitute_identities(field, accounts)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_identity_leaves_and_keeps_the_rest() {
        let key = Pubkey::new_unique();
        let mut accounts = PackedAccounts::default();
        let value = PackedValue::Struct(vec![
            ("owner".into(), PackedValue::Identity(key)),
            ("amount".into(), PackedValue::Integer(500)),
            ("blob".into(), PackedValue::Bytes(vec![1, 2, 3])),
        ]);

        let substituted = substitute_identities(value, &mut accounts);
        assert_eq!(
            substituted,
            PackedValue::Struct(vec![
                ("owner".into(), PackedValue::Index(0)),
                ("amount".into(), PackedValue::Integer(500)),
                ("blob".into(), PackedValue::Bytes(vec![1, 2, 3])),
            ])
        );
    }

    #[test]
    fn duplicate_identities_share_one_index() {
        let shared = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let mut accounts = PackedAccounts::default();
        let value = PackedValue::List(vec![
            PackedValue::Identity(shared),
            PackedValue::Struct(vec![
                ("delegate".into(), PackedValue::Identity(other)),
                (
                    "inner".into(),
                    PackedValue::List(vec![PackedValue::Identity(shared)]),
                ),
            ]),
        ]);

        let substituted = substitute_identities(value, &mut accounts);
        assert_eq!(
            substituted,
            PackedValue::List(vec![
                PackedValue::Index(0),
                PackedValue::Struct(vec![
                    ("delegate".into(), PackedValue::Index(1)),
                    ("inner".into(), PackedValue::List(vec![PackedValue::Index(0)])),
                ]),
            ])
        );
        let (metas, _, _) = accounts.to_account_metas();
        assert_eq!(metas.len(), 2);
    }

    #[test]
    fn big_integers_pass_through() {
        let mut accounts = PackedAccounts::default();
        let value = PackedValue::BigInteger(u128::MAX);
        assert_eq!(
            substitute_identities(value.clone(), &mut accounts),
            value
        );
    }
}
