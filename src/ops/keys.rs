use redis::{ErrorKind, FromRedisValue, RedisResult, Value};
use std::collections::HashSet;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use strum_macros::{Display, EnumString};

use crate::facade::Facade;
use crate::Error;

/// The type tag Redis reports for a key, as returned by [`Facade::key_type`].
/// `None` means the key does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DataType {
    None,
    String,
    List,
    Set,
    ZSet,
    Hash,
    Stream,
}

impl FromRedisValue for DataType {
    fn from_redis_value(v: &Value) -> RedisResult<DataType> {
        let tag: String = FromRedisValue::from_redis_value(v)?;
        DataType::from_str(&tag)
            .map_err(|_| (ErrorKind::TypeError, "unrecognized TYPE reply", tag).into())
    }
}

impl Facade {
    /// Removes the given keys. Keys that do not exist are ignored.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/del/>
    pub async fn del(&self, keys: &[&str]) -> Result<(), Error> {
        let mut conn = self.conn().await?;
        let _: () = redis::cmd("DEL").arg(keys).query_async(&mut conn).await?;
        Ok(())
    }

    /// Returns whether `key` exists.
    pub async fn exists(&self, key: &str) -> Result<bool, Error> {
        let mut conn = self.conn().await?;
        let exists = redis::cmd("EXISTS").arg(key).query_async(&mut conn).await?;
        Ok(exists)
    }

    /// Sets a time to live on `key` relative to now. Returns `false` if the
    /// key does not exist. Millisecond resolution.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/pexpire/>
    pub async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, Error> {
        let mut conn = self.conn().await?;
        let set = redis::cmd("PEXPIRE")
            .arg(key)
            .arg(ttl.as_millis() as i64)
            .query_async(&mut conn)
            .await?;
        Ok(set)
    }

    /// Sets an absolute wall-clock expiry on `key`. Returns `false` if the
    /// key does not exist. An instant in the past deletes the key.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/pexpireat/>
    pub async fn expire_at(&self, key: &str, when: SystemTime) -> Result<bool, Error> {
        let unix_ms = when.duration_since(UNIX_EPOCH)?.as_millis() as i64;

        let mut conn = self.conn().await?;
        let set = redis::cmd("PEXPIREAT")
            .arg(key)
            .arg(unix_ms)
            .query_async(&mut conn)
            .await?;
        Ok(set)
    }

    /// Returns every key matching the glob `pattern`.
    ///
    /// This runs KEYS on the server: a blocking scan of the entire keyspace.
    /// It is fine against small development databases and unsuitable for
    /// large keyspaces or latency-sensitive callers.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/keys/>
    pub async fn keys(&self, pattern: &str) -> Result<HashSet<String>, Error> {
        let mut conn = self.conn().await?;
        let keys = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await?;
        Ok(keys)
    }

    /// Clears any expiry on `key`, making it permanent. Returns `false` if
    /// the key does not exist or had no expiry.
    pub async fn persist(&self, key: &str) -> Result<bool, Error> {
        let mut conn = self.conn().await?;
        let cleared = redis::cmd("PERSIST").arg(key).query_async(&mut conn).await?;
        Ok(cleared)
    }

    /// Returns a random existing key, or `None` when the database is empty.
    pub async fn random_key(&self) -> Result<Option<String>, Error> {
        let mut conn = self.conn().await?;
        let key = redis::cmd("RANDOMKEY").query_async(&mut conn).await?;
        Ok(key)
    }

    /// Renames `key` to `new_key` only when `new_key` does not already
    /// exist. Returns whether the rename happened. Renaming a missing key is
    /// a server error.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/renamenx/>
    pub async fn rename_nx(&self, key: &str, new_key: &str) -> Result<bool, Error> {
        let mut conn = self.conn().await?;
        let renamed = redis::cmd("RENAMENX")
            .arg(key)
            .arg(new_key)
            .query_async(&mut conn)
            .await?;
        Ok(renamed)
    }

    /// Returns the remaining time to live of `key` in seconds, passing the
    /// server's reply through unmodified: `-2` when the key does not exist,
    /// `-1` when it exists without an expiry.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/ttl/>
    pub async fn ttl(&self, key: &str) -> Result<i64, Error> {
        let mut conn = self.conn().await?;
        let ttl = redis::cmd("TTL").arg(key).query_async(&mut conn).await?;
        Ok(ttl)
    }

    /// Returns the store's type tag for `key`.
    pub async fn key_type(&self, key: &str) -> Result<DataType, Error> {
        let mut conn = self.conn().await?;
        let data_type = redis::cmd("TYPE").arg(key).query_async(&mut conn).await?;
        Ok(data_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_parses_server_tags() {
        assert_eq!("none".parse(), Ok(DataType::None));
        assert_eq!("string".parse(), Ok(DataType::String));
        assert_eq!("zset".parse(), Ok(DataType::ZSet));
        assert!("bitmap".parse::<DataType>().is_err());
    }

    #[test]
    fn data_type_from_redis_status_reply() {
        // TYPE replies with a simple string.
        let parsed = DataType::from_redis_value(&Value::Status("list".to_string())).unwrap();
        assert_eq!(parsed, DataType::List);

        assert!(DataType::from_redis_value(&Value::Status("what".to_string())).is_err());
    }
}
