//! 封禁目标解析
//!
//! 频道在 join/quit 刷屏时会把用户转发到另一个频道，此时 `+b` 的目标形如
//! `*!*@1.2.3.4$#overflow`：`$#` 之前是 banmask，之后是转发频道。

/// 转发后缀的分隔符
const FORWARD_SEPARATOR: &str = "$#";

/// 解析后的封禁目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BanTarget<'a> {
    /// 不含转发后缀的 banmask
    pub banmask: &'a str,
    /// 转发频道（含 `#`），没有转发时为 `None`
    pub forwarded_to: Option<&'a str>,
}

impl<'a> BanTarget<'a> {
    /// 解析封禁目标，缺少转发后缀不是错误
    pub fn parse(target: &'a str) -> Self {
        match target.find(FORWARD_SEPARATOR) {
            Some(idx) => Self {
                banmask: &target[..idx],
                // 只去掉 `$`，保留频道名前的 `#`
                forwarded_to: Some(&target[idx + 1..]),
            },
            None => Self {
                banmask: target,
                forwarded_to: None,
            },
        }
    }

    /// 由转发频道合成的封禁原因
    pub fn reason(&self) -> Option<String> {
        self.forwarded_to
            .map(|channel| format!("Join/Quit flood, user forwarded to {}", channel))
    }
}
