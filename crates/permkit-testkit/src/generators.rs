//! Proptest generators for property-based testing.
//!
//! Alphabets are kept small on purpose so generated holders contain plenty of
//! nodes sharing a type, priority or context.

use proptest::prelude::*;

use permkit_core::{make_chat_meta_node, ChatMetaType, ImmutableContextSet, Node};

/// Generate a chat meta type.
pub fn meta_type() -> impl Strategy<Value = ChatMetaType> {
    prop_oneof![Just(ChatMetaType::Prefix), Just(ChatMetaType::Suffix)]
}

/// Generate a small non-negative priority.
pub fn priority() -> impl Strategy<Value = i32> {
    0i32..4
}

/// Generate a meta value, including ones that need escaping.
pub fn meta_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("A".to_string()),
        Just("B".to_string()),
        Just("[Admin] ".to_string()),
        Just("v1.2".to_string()),
        Just("back\\slash".to_string()),
        "[a-z.]{1,6}",
    ]
}

/// Generate a single context pair.
pub fn context_pair() -> impl Strategy<Value = (String, String)> {
    (
        prop_oneof![Just("world"), Just("server")],
        prop_oneof![Just("nether"), Just("end"), Just("lobby")],
    )
        .prop_map(|(k, v)| (k.to_string(), v.to_string()))
}

/// Generate up to `max` context pairs (duplicates allowed).
pub fn context_pairs(max: usize) -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(context_pair(), 0..=max)
}

/// Generate an immutable context set.
pub fn context_set() -> impl Strategy<Value = ImmutableContextSet> {
    context_pairs(3).prop_map(|pairs| {
        // Generated pairs are never empty, so this cannot fail.
        ImmutableContextSet::from_pairs(pairs).unwrap_or_default()
    })
}

/// Generate an expiry; `None` means permanent.
pub fn expiry() -> impl Strategy<Value = Option<i64>> {
    prop::option::weighted(0.3, 1_000i64..=10_000)
}

/// Parameters for generating a chat meta node.
#[derive(Debug, Clone)]
pub struct NodeParams {
    pub meta_type: ChatMetaType,
    pub priority: i32,
    pub value: String,
    pub contexts: ImmutableContextSet,
    pub expiry: Option<i64>,
}

impl Arbitrary for NodeParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (meta_type(), priority(), meta_value(), context_set(), expiry())
            .prop_map(|(meta_type, priority, value, contexts, expiry)| NodeParams {
                meta_type,
                priority,
                value,
                contexts,
                expiry,
            })
            .boxed()
    }
}

/// Build a node from parameters.
pub fn node_from_params(params: &NodeParams) -> Node {
    let mut builder = make_chat_meta_node(params.meta_type, params.priority, &params.value)
        .with_contexts(&params.contexts);
    if let Some(at) = params.expiry {
        builder = builder.expiry(at);
    }
    builder.build()
}

/// Generate a chat meta node.
pub fn chat_meta_node() -> impl Strategy<Value = Node> {
    any::<NodeParams>().prop_map(|params| node_from_params(&params))
}

/// Generate a plain (non meta) permission node.
pub fn permission_node() -> impl Strategy<Value = Node> {
    ("[a-z]{1,8}(\\.[a-z]{1,8}){0,2}", any::<bool>(), context_set()).prop_map(
        |(key, value, contexts)| Node::builder(key).value(value).with_contexts(&contexts).build(),
    )
}

/// Generate a holder's node list: mostly chat meta, some plain permissions.
pub fn holder_nodes(max: usize) -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(
        prop_oneof![4 => chat_meta_node(), 1 => permission_node()],
        0..=max,
    )
}
