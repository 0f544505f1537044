//! Command handler for the shell

use slotlru::LruCache;
use tracing::debug;

use crate::command::Command;
use crate::reply::Reply;

pub struct CommandHandler {
    cache: LruCache<String, String>,
}

impl CommandHandler {
    pub fn new(cache: LruCache<String, String>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &LruCache<String, String> {
        &self.cache
    }

    pub fn handle(&mut self, cmd: Command) -> Reply {
        debug!(?cmd, "handling command");

        match cmd {
            Command::Ping(None) => Reply::Status("PONG".to_string()),
            Command::Ping(Some(msg)) => Reply::Bulk(Some(msg)),
            Command::Get(key) => self.handle_get(&key),
            Command::Peek(key) => Reply::Bulk(self.cache.peek(key.as_str()).cloned()),
            Command::Put(key, value) => {
                self.cache.put(key, value);
                Reply::ok()
            }
            Command::Del(keys) => self.handle_del(&keys),
            Command::Exists(keys) => self.handle_exists(&keys),
            Command::Len => Reply::Integer(self.cache.len() as i64),
            Command::Dump => self.handle_dump(),
            Command::Clear => self.handle_clear(),
            Command::Info => self.handle_info(),
            Command::Quit => Reply::Status("BYE".to_string()),
        }
    }

    fn handle_get(&mut self, key: &str) -> Reply {
        Reply::Bulk(self.cache.get(key).cloned())
    }

    fn handle_del(&mut self, keys: &[String]) -> Reply {
        let deleted = keys
            .iter()
            .filter(|key| self.cache.delete(key.as_str()).is_some())
            .count();
        Reply::Integer(deleted as i64)
    }

    fn handle_exists(&self, keys: &[String]) -> Reply {
        let count = keys
            .iter()
            .filter(|key| self.cache.contains(key.as_str()))
            .count();
        Reply::Integer(count as i64)
    }

    fn handle_dump(&self) -> Reply {
        Reply::Pairs(
            self.cache
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    fn handle_clear(&mut self) -> Reply {
        self.cache.clear();
        self.cache.stats().reset();
        Reply::ok()
    }

    fn handle_info(&self) -> Reply {
        let stats = self.cache.stats();
        let info = format!(
            "# Cache\n\
             slotlru_version:{}\n\
             capacity:{}\n\
             len:{}\n\
             \n\
             # Stats\n\
             hits:{}\n\
             misses:{}\n\
             hit_ratio:{:.2}\n\
             inserts:{}\n\
             updates:{}\n\
             evictions:{}\n\
             deletes:{}\n",
            env!("CARGO_PKG_VERSION"),
            self.cache.capacity(),
            self.cache.len(),
            stats.hits(),
            stats.misses(),
            stats.hit_ratio(),
            stats.inserts(),
            stats.updates(),
            stats.evictions(),
            stats.deletes(),
        );
        Reply::Text(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(capacity: usize) -> CommandHandler {
        CommandHandler::new(LruCache::new(capacity).unwrap())
    }

    fn run(handler: &mut CommandHandler, line: &str) -> Reply {
        let cmd = Command::parse(line).unwrap().unwrap();
        handler.handle(cmd)
    }

    fn bulk(s: &str) -> Reply {
        Reply::Bulk(Some(s.to_string()))
    }

    #[test]
    fn test_ping() {
        let mut h = handler(4);
        assert_eq!(run(&mut h, "PING"), Reply::Status("PONG".to_string()));
        assert_eq!(run(&mut h, "PING hello"), bulk("hello"));
    }

    #[test]
    fn test_put_and_get() {
        let mut h = handler(4);

        assert_eq!(run(&mut h, "PUT mykey myvalue"), Reply::ok());
        assert_eq!(run(&mut h, "GET mykey"), bulk("myvalue"));
        assert_eq!(run(&mut h, "GET other"), Reply::Bulk(None));
    }

    #[test]
    fn test_walkthrough() {
        let mut h = handler(3);

        run(&mut h, "PUT k1 v1");
        run(&mut h, "PUT k2 v2");
        run(&mut h, "PUT k3 v3");
        assert_eq!(run(&mut h, "GET k1"), bulk("v1"));
        run(&mut h, "PUT k4 v4");

        assert_eq!(
            run(&mut h, "DUMP"),
            Reply::Pairs(vec![
                ("k4".into(), "v4".into()),
                ("k1".into(), "v1".into()),
                ("k3".into(), "v3".into()),
            ])
        );

        assert_eq!(run(&mut h, "DEL k3 k2"), Reply::Integer(1));
        assert_eq!(run(&mut h, "GET k3"), Reply::Bulk(None));
        assert_eq!(run(&mut h, "LEN"), Reply::Integer(2));
    }

    #[test]
    fn test_exists_and_peek_do_not_promote() {
        let mut h = handler(2);

        run(&mut h, "PUT a 1");
        run(&mut h, "PUT b 2");
        assert_eq!(run(&mut h, "EXISTS a b c"), Reply::Integer(2));
        assert_eq!(run(&mut h, "PEEK a"), bulk("1"));
        run(&mut h, "PUT c 3"); // a is still least recently used

        assert_eq!(run(&mut h, "EXISTS a"), Reply::Integer(0));
    }

    #[test]
    fn test_clear_resets_stats() {
        let mut h = handler(2);

        run(&mut h, "PUT a 1");
        run(&mut h, "GET a");
        assert_eq!(run(&mut h, "FLUSHDB"), Reply::ok());

        assert!(h.cache().is_empty());
        assert_eq!(h.cache().stats().hits(), 0);
    }

    #[test]
    fn test_info() {
        let mut h = handler(2);

        run(&mut h, "PUT a 1");
        run(&mut h, "GET a");
        run(&mut h, "GET b");

        let info = match run(&mut h, "INFO") {
            Reply::Text(text) => text,
            other => panic!("unexpected reply {:?}", other),
        };
        assert!(info.contains("capacity:2\n"));
        assert!(info.contains("len:1\n"));
        assert!(info.contains("hits:1\n"));
        assert!(info.contains("misses:1\n"));
        assert!(info.contains("hit_ratio:0.50\n"));
    }

    #[test]
    fn test_quoted_values() {
        let mut h = handler(2);

        run(&mut h, r#"PUT "two words" "a value""#);
        assert_eq!(run(&mut h, r#"GET "two words""#), bulk("a value"));
    }
}
