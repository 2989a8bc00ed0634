//! 前缀编解码的对称性。
//!
//! 对任意不以前缀开头的逻辑路径，`decode(encode(path)) == path`；
//! 对以 `/` 结尾的归一化前缀，编码结果总是落在前缀之下。

use navis_core::{decode_with_prefix, encode_with_prefix};
use proptest::prelude::*;

fn prefix_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::from("/")),
        "[a-z]{1,6}".prop_map(|segment| format!("/{segment}/")),
        "[a-z]{1,4}/[a-z]{1,4}".prop_map(|segments| format!("/{segments}/")),
    ]
}

fn path_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_/-]{0,24}(\\?[a-z]=[0-9]{1,3})?".prop_map(|tail| format!("/{tail}"))
}

proptest! {
    #[test]
    fn decode_inverts_encode(prefix in prefix_strategy(), path in path_strategy()) {
        prop_assume!(prefix == "/" || !path.starts_with(&prefix));
        let encoded = encode_with_prefix(&prefix, &path);
        prop_assert!(encoded.starts_with(&prefix));
        prop_assert_eq!(decode_with_prefix(&prefix, &encoded), path);
    }

    #[test]
    fn encode_is_idempotent(prefix in prefix_strategy(), path in path_strategy()) {
        let once = encode_with_prefix(&prefix, &path);
        let twice = encode_with_prefix(&prefix, &once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn decoded_paths_are_rooted(prefix in prefix_strategy(), raw in "[a-z0-9/]{0,16}") {
        prop_assert!(decode_with_prefix(&prefix, &raw).starts_with('/'));
    }
}
