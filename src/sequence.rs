//! 请求序号
//!
//! 每次发起请求领取一个 [`Ticket`]，响应返回时只有最新的 ticket 会被采纳，
//! 迟到的旧响应直接丢弃。

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 领取新 ticket，之前发出的 ticket 全部作废
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// 作废所有在途请求（例如视图卸载或查询被清空）
    pub fn invalidate(&mut self) {
        self.issue();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut seq = RequestSequence::new();
        let first = seq.issue();
        assert!(seq.is_current(first));

        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(second > first);

        seq.invalidate();
        assert!(!seq.is_current(second));
    }
}
