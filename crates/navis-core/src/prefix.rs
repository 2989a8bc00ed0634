//! 前缀编解码。
//!
//! 逻辑地址（中间件看到的 `/users/7`）与网络地址（地址栏中的 `/app/users/7`）之间的对称转换。
//! 两个函数都假定 `prefix` 已经归一化为以 `/` 结尾。

/// 为逻辑地址补上前缀；已带前缀的地址原样返回。
pub fn encode_with_prefix(prefix: &str, address: &str) -> String {
    if address.starts_with(prefix) {
        return address.to_owned();
    }
    let relative = address.strip_prefix('/').unwrap_or(address);
    format!("{prefix}{relative}")
}

/// 剥离前缀，返回以 `/` 开头的逻辑地址。
///
/// 恰好等于去掉结尾 `/` 的前缀（如 `/app`）时视为根路径。
pub fn decode_with_prefix(prefix: &str, address: &str) -> String {
    if let Some(rest) = address.strip_prefix(prefix) {
        return format!("/{rest}");
    }
    if let Some(bare) = prefix.strip_suffix('/')
        && !bare.is_empty()
        && address == bare
    {
        return String::from("/");
    }
    if address.starts_with('/') {
        address.to_owned()
    } else {
        format!("/{address}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_adds_prefix_once() {
        assert_eq!(encode_with_prefix("/app/", "/x"), "/app/x");
        assert_eq!(encode_with_prefix("/app/", "x"), "/app/x");
        assert_eq!(encode_with_prefix("/app/", "/app/x"), "/app/x");
        assert_eq!(encode_with_prefix("/", "/x?q=1"), "/x?q=1");
    }

    #[test]
    fn decode_strips_prefix_and_keeps_leading_slash() {
        assert_eq!(decode_with_prefix("/app/", "/app/x"), "/x");
        assert_eq!(decode_with_prefix("/app/", "/app/"), "/");
        assert_eq!(decode_with_prefix("/app/", "/app"), "/");
        assert_eq!(decode_with_prefix("/app/", "/other"), "/other");
        assert_eq!(decode_with_prefix("/app/", "other"), "/other");
        assert_eq!(decode_with_prefix("/", "/x"), "/x");
    }

    #[test]
    fn multibyte_prefixes_never_split_a_character() {
        assert_eq!(decode_with_prefix("/é", "/x"), "/x");
        assert_eq!(decode_with_prefix("/é", "/é"), "/");
        assert_eq!(decode_with_prefix("/é/", "/é"), "/");
        assert_eq!(decode_with_prefix("/é/", "/é/x"), "/x");
    }
}
