use redis::{FromRedisValue, ToRedisArgs};
use std::time::Duration;

use crate::facade::Facade;
use crate::Error;

impl Facade {
    /// Appends `value` to the string stored at `key`, creating the key when
    /// it is absent (as a plain SET would). Returns the new length.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/append/>
    pub async fn append(&self, key: &str, value: &str) -> Result<i64, Error> {
        let mut conn = self.conn().await?;
        let len = redis::cmd("APPEND")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(len)
    }

    /// Decrements the integer stored at `key` by one, initializing an absent
    /// key to zero first. Returns the value after the decrement.
    pub async fn decr(&self, key: &str) -> Result<i64, Error> {
        let mut conn = self.conn().await?;
        let value = redis::cmd("DECR").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    /// Decrements the integer stored at `key` by `decrement`. A value of the
    /// wrong type or one that does not parse as an integer is a server
    /// error.
    pub async fn decr_by(&self, key: &str, decrement: i64) -> Result<i64, Error> {
        let mut conn = self.conn().await?;
        let value = redis::cmd("DECRBY")
            .arg(key)
            .arg(decrement)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    /// Increments the integer stored at `key` by one. Returns the value
    /// after the increment.
    pub async fn incr(&self, key: &str) -> Result<i64, Error> {
        let mut conn = self.conn().await?;
        let value = redis::cmd("INCR").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    /// Increments the integer stored at `key` by `increment`.
    pub async fn incr_by(&self, key: &str, increment: i64) -> Result<i64, Error> {
        let mut conn = self.conn().await?;
        let value = redis::cmd("INCRBY")
            .arg(key)
            .arg(increment)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    /// Increments the float stored at `key` by `increment`. Returns the
    /// value after the increment.
    pub async fn incr_by_float(&self, key: &str, increment: f64) -> Result<f64, Error> {
        let mut conn = self.conn().await?;
        let value = redis::cmd("INCRBYFLOAT")
            .arg(key)
            .arg(increment)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    /// Reads the value stored at `key`. `None` when the key does not exist.
    pub async fn get<V>(&self, key: &str) -> Result<Option<V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let value = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    /// Returns the substring of the string at `key` between byte offsets
    /// `start` and `end`, both inclusive. Negative offsets count back from
    /// the end of the string; out-of-range requests are clamped by the
    /// server. A missing key reads as the empty string.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/getrange/>
    pub async fn get_range(&self, key: &str, start: i64, end: i64) -> Result<String, Error> {
        let mut conn = self.conn().await?;
        let substring = redis::cmd("GETRANGE")
            .arg(key)
            .arg(start)
            .arg(end)
            .query_async(&mut conn)
            .await?;
        Ok(substring)
    }

    /// Atomically replaces the value at `key` with `value` and returns the
    /// old value, `None` when the key did not exist.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/getset/>
    pub async fn get_set<V, R>(&self, key: &str, value: V) -> Result<Option<R>, Error>
    where
        V: ToRedisArgs,
        R: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let old = redis::cmd("GETSET")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(old)
    }

    /// Reads several keys in one round trip. The result has exactly one
    /// entry per input key, in input order, with `None` for keys that do not
    /// exist.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/mget/>
    pub async fn mget<V>(&self, keys: &[&str]) -> Result<Vec<Option<V>>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let values = redis::cmd("MGET").arg(keys).query_async(&mut conn).await?;
        Ok(values)
    }

    /// Sets several key-value pairs in one atomic round trip, overwriting
    /// existing keys.
    pub async fn mset<V>(&self, items: &[(&str, V)]) -> Result<(), Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let _: () = redis::cmd("MSET").arg(items).query_async(&mut conn).await?;
        Ok(())
    }

    /// Sets several key-value pairs only when none of the target keys exist.
    /// All-or-nothing: if even one key already exists, nothing is written
    /// and `false` is returned.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/msetnx/>
    pub async fn mset_nx<V>(&self, items: &[(&str, V)]) -> Result<bool, Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let written = redis::cmd("MSETNX")
            .arg(items)
            .query_async(&mut conn)
            .await?;
        Ok(written)
    }

    /// Sets `key` to `value`, overwriting any existing value and clearing
    /// any expiry.
    pub async fn set<V>(&self, key: &str, value: V) -> Result<(), Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    /// Sets `key` to `value` with a time to live, in one atomic round trip.
    /// Millisecond resolution.
    pub async fn set_ex<V>(&self, key: &str, value: V, ttl: Duration) -> Result<(), Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(ttl.as_millis() as i64)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    /// Sets `key` to `value` with a time to live, only when the key does not
    /// already exist. Returns whether the write happened. Value and expiry
    /// are applied in one atomic round trip.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/set/>
    pub async fn set_nx<V>(&self, key: &str, value: V, ttl: Duration) -> Result<bool, Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let written = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl.as_millis() as i64)
            .query_async(&mut conn)
            .await?;
        Ok(written)
    }
}
