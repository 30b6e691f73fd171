//! Display-surface line formats.
//!
//! These strings are kept byte-for-byte stable: chat logs written by earlier
//! releases use the same shapes, and people grep them.

pub fn chat(nick: &str, msg: &str) -> String {
    format!("<{}> {}", nick, msg)
}

pub fn topic(msg: &str) -> String {
    format!("Topic :{}", msg)
}

pub fn part(nick: &str, chan: &str) -> String {
    format!(">>> {} has left {} <<<", nick, chan)
}

pub fn join(nick: &str, chan: &str) -> String {
    format!(">>> {} has joined {} <<<", nick, chan)
}

pub fn nick_change(old: &str, new: &str) -> String {
    format!(">>> {} is now known as {} <<<", old, new)
}

pub fn peers(list: &str) -> String {
    format!("Peers:{}", list)
}

pub fn quit(nick: &str, reason: &str) -> String {
    format!(">>> {} has quit ({}) <<<", nick, reason)
}

pub fn kick(nick: &str, target: &str, chan: &str, reason: &str) -> String {
    format!(">>> {} has kicked {} from {} ({}) <<<", nick, target, chan, reason)
}

pub fn mode(nick: &str, modes: &str, target: &str) -> String {
    format!(">>> {} sets mode {} {} <<<", nick, modes, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_shapes_are_stable() {
        assert_eq!(chat("vy", "hello"), "<vy> hello");
        assert_eq!(topic("welcome"), "Topic :welcome");
        assert_eq!(part("vy", "#test"), ">>> vy has left #test <<<");
        assert_eq!(join("vy", "#test"), ">>> vy has joined #test <<<");
        assert_eq!(nick_change("vy", "vy_"), ">>> vy is now known as vy_ <<<");
        assert_eq!(peers("@op +voiced plain"), "Peers:@op +voiced plain");
        assert_eq!(quit("vy", "bye"), ">>> vy has quit (bye) <<<");
        assert_eq!(
            kick("op", "vy", "#test", "spam"),
            ">>> op has kicked vy from #test (spam) <<<"
        );
        assert_eq!(
            mode("op", "+o vy", "#test"),
            ">>> op sets mode +o vy #test <<<"
        );
    }
}
