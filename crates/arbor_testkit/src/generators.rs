//! Property-based test generators using proptest.
//!
//! Provides strategies for operation-model values and for sequences of
//! create-builder setter calls, together with a reference model of what
//! those sequences should configure.

use crate::fixtures::STAT_POOL_SIZE;
use arbor_proto::{
    Acl, AclList, CreateMode, CreateOption, CreateOptions, DeleteOption, DeleteOptions, Id,
    OptionFlag, Perms, Version,
};
use proptest::prelude::*;

/// Strategy for creation modes.
pub fn create_mode_strategy() -> impl Strategy<Value = CreateMode> {
    prop::sample::select(CreateMode::ALL.to_vec())
}

/// Strategy for create option sets, including the empty set.
pub fn create_options_strategy() -> impl Strategy<Value = CreateOptions> {
    prop::collection::vec(prop::sample::select(CreateOption::ALL), 0..=CreateOption::ALL.len())
        .prop_map(|flags| flags.into_iter().collect())
}

/// Strategy for delete option sets, including the empty set.
pub fn delete_options_strategy() -> impl Strategy<Value = DeleteOptions> {
    prop::collection::vec(prop::sample::select(DeleteOption::ALL), 0..=DeleteOption::ALL.len())
        .prop_map(|flags| flags.into_iter().collect())
}

/// Strategy for single ACL entries.
pub fn acl_strategy() -> impl Strategy<Value = Acl> {
    (
        1u32..=Perms::ALL.bits(),
        prop_oneof![Just("world"), Just("auth"), Just("digest"), Just("ip")],
        "[a-z0-9]{1,12}",
    )
        .prop_map(|(bits, scheme, id)| Acl::new(Perms::from_bits(bits), Id::new(scheme, id)))
}

/// Strategy for ACL lists: the well-known lists or a random one.
pub fn acl_list_strategy() -> impl Strategy<Value = AclList> {
    prop_oneof![
        Just(AclList::open_unsafe()),
        Just(AclList::creator_all()),
        Just(AclList::read_unsafe()),
        prop::collection::vec(acl_strategy(), 1..4).prop_map(|entries| AclList::new(entries)),
    ]
}

/// Strategy for an optional ACL, where `None` means the service default.
pub fn optional_acl_strategy() -> impl Strategy<Value = Option<AclList>> {
    prop::option::of(acl_list_strategy())
}

/// Strategy for valid absolute node paths.
pub fn node_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9_-]{1,12}", 1..5)
        .prop_map(|components| format!("/{}", components.join("/")))
}

/// Strategy for node payloads.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

/// Strategy for version guards, including the wildcard.
pub fn version_strategy() -> impl Strategy<Value = Version> {
    prop_oneof![
        1 => Just(Version::ANY),
        3 => (0i32..10_000).prop_map(Version::new),
    ]
}

/// One setter call on the create builder.
///
/// Stat slots are referenced by index into a [`StatPool`](crate::StatPool)
/// so that generated sequences stay plain data.
#[derive(Debug, Clone)]
pub enum CreateSetter {
    /// `storing_stat_in`
    StoringStatIn(usize),
    /// `with_mode`
    WithMode(CreateMode),
    /// `with_acl`
    WithAcl(Option<AclList>),
    /// `with_options`
    WithOptions(CreateOptions),
    /// `with_options_and_acl`
    WithOptionsAndAcl(CreateOptions, Option<AclList>),
    /// `with_options_and_mode`
    WithOptionsAndMode(CreateOptions, CreateMode),
    /// `with_options_mode_and_acl`
    WithOptionsModeAndAcl(CreateOptions, CreateMode, Option<AclList>),
    /// `with_options_mode_acl_and_stat`
    WithOptionsModeAclAndStat(CreateOptions, CreateMode, Option<AclList>, Option<usize>),
}

/// Strategy for a single setter call.
pub fn create_setter_strategy() -> impl Strategy<Value = CreateSetter> {
    let stat = 0..STAT_POOL_SIZE;
    prop_oneof![
        stat.clone().prop_map(CreateSetter::StoringStatIn),
        create_mode_strategy().prop_map(CreateSetter::WithMode),
        optional_acl_strategy().prop_map(CreateSetter::WithAcl),
        create_options_strategy().prop_map(CreateSetter::WithOptions),
        (create_options_strategy(), optional_acl_strategy())
            .prop_map(|(o, a)| CreateSetter::WithOptionsAndAcl(o, a)),
        (create_options_strategy(), create_mode_strategy())
            .prop_map(|(o, m)| CreateSetter::WithOptionsAndMode(o, m)),
        (
            create_options_strategy(),
            create_mode_strategy(),
            optional_acl_strategy()
        )
            .prop_map(|(o, m, a)| CreateSetter::WithOptionsModeAndAcl(o, m, a)),
        (
            create_options_strategy(),
            create_mode_strategy(),
            optional_acl_strategy(),
            prop::option::of(stat)
        )
            .prop_map(|(o, m, a, s)| CreateSetter::WithOptionsModeAclAndStat(o, m, a, s)),
    ]
}

/// Strategy for a sequence of setter calls.
pub fn create_setters_strategy(
    len: impl Into<prop::collection::SizeRange>,
) -> impl Strategy<Value = Vec<CreateSetter>> {
    prop::collection::vec(create_setter_strategy(), len)
}

/// Reference model of a create builder's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedCreate {
    /// Expected mode.
    pub mode: CreateMode,
    /// Expected ACL.
    pub acl: Option<AclList>,
    /// Expected options.
    pub options: CreateOptions,
    /// Index of the expected stat slot.
    pub stat: Option<usize>,
}

impl ExpectedCreate {
    /// Applies one setter call to the model.
    pub fn apply(&mut self, setter: &CreateSetter) {
        match setter.clone() {
            CreateSetter::StoringStatIn(stat) => self.stat = Some(stat),
            CreateSetter::WithMode(mode) => self.mode = mode,
            CreateSetter::WithAcl(acl) => self.acl = acl,
            CreateSetter::WithOptions(options) => self.options = options,
            CreateSetter::WithOptionsAndAcl(options, acl) => {
                self.options = options;
                self.acl = acl;
            }
            CreateSetter::WithOptionsAndMode(options, mode) => {
                self.options = options;
                self.mode = mode;
            }
            CreateSetter::WithOptionsModeAndAcl(options, mode, acl) => {
                self.options = options;
                self.mode = mode;
                self.acl = acl;
            }
            CreateSetter::WithOptionsModeAclAndStat(options, mode, acl, stat) => {
                *self = ExpectedCreate {
                    mode,
                    acl,
                    options,
                    stat,
                };
            }
        }
    }

    /// Runs the model over a whole sequence, starting from the defaults.
    pub fn from_setters(setters: &[CreateSetter]) -> Self {
        let mut expected = Self::default();
        for setter in setters {
            expected.apply(setter);
        }
        expected
    }
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_proto::validate_path;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn node_paths_are_valid(path in node_path_strategy()) {
            prop_assert!(validate_path(&path).is_ok());
        }

        #[test]
        fn acl_entries_grant_something(acl in acl_strategy()) {
            prop_assert!(acl.perms.bits() != 0);
        }

        #[test]
        fn full_setter_resets_the_model(
            setters in create_setters_strategy(0..6),
            options in create_options_strategy(),
            mode in create_mode_strategy(),
        ) {
            let mut all = setters;
            all.push(CreateSetter::WithOptionsModeAclAndStat(options, mode, None, None));
            let expected = ExpectedCreate::from_setters(&all);
            prop_assert_eq!(expected, ExpectedCreate { mode, acl: None, options, stat: None });
        }
    }

    #[test]
    fn options_and_acl_keep_mode() {
        let expected = ExpectedCreate::from_setters(&[
            CreateSetter::WithMode(CreateMode::Container),
            CreateSetter::WithOptionsAndAcl(CreateOptions::empty(), Some(AclList::creator_all())),
        ]);
        assert_eq!(expected.mode, CreateMode::Container);
        assert_eq!(expected.acl, Some(AclList::creator_all()));
    }
}
