use redis::{FromRedisValue, ToRedisArgs};
use std::time::Duration;

use crate::facade::Facade;
use crate::Error;

impl Facade {
    /// Pops the head element of the list at `key`, blocking until an element
    /// arrives or `timeout` elapses. `None` means the timeout elapsed with
    /// the list still empty. A zero timeout blocks indefinitely, per server
    /// semantics. Sub-second timeouts are supported (Redis 6 and later).
    ///
    /// Ref: <https://redis.io/docs/latest/commands/blpop/>
    pub async fn blpop<V>(&self, key: &str, timeout: Duration) -> Result<Option<V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let popped: Option<(String, V)> = redis::cmd("BLPOP")
            .arg(key)
            .arg(timeout.as_secs_f64())
            .query_async(&mut conn)
            .await?;
        Ok(popped.map(|(_key, element)| element))
    }

    /// Pops the tail element of the list at `key`, blocking until an element
    /// arrives or `timeout` elapses.
    pub async fn brpop<V>(&self, key: &str, timeout: Duration) -> Result<Option<V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let popped: Option<(String, V)> = redis::cmd("BRPOP")
            .arg(key)
            .arg(timeout.as_secs_f64())
            .query_async(&mut conn)
            .await?;
        Ok(popped.map(|(_key, element)| element))
    }

    /// Atomically pops the tail of `source` and pushes it onto the head of
    /// `destination`, blocking until an element arrives or `timeout`
    /// elapses. Returns the rotated element, `None` on timeout.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/brpoplpush/>
    pub async fn brpoplpush<V>(
        &self,
        source: &str,
        destination: &str,
        timeout: Duration,
    ) -> Result<Option<V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let element = redis::cmd("BRPOPLPUSH")
            .arg(source)
            .arg(destination)
            .arg(timeout.as_secs_f64())
            .query_async(&mut conn)
            .await?;
        Ok(element)
    }

    /// Reads the element at `index` of the list at `key`. Negative indexes
    /// count back from the tail. `None` when the index is out of range.
    pub async fn lindex<V>(&self, key: &str, index: i64) -> Result<Option<V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let element = redis::cmd("LINDEX")
            .arg(key)
            .arg(index)
            .query_async(&mut conn)
            .await?;
        Ok(element)
    }

    /// Returns the length of the list at `key`, zero for a missing key.
    pub async fn llen(&self, key: &str) -> Result<i64, Error> {
        let mut conn = self.conn().await?;
        let len = redis::cmd("LLEN").arg(key).query_async(&mut conn).await?;
        Ok(len)
    }

    /// Pops the head element of the list at `key` without blocking. `None`
    /// when the list is empty or missing.
    pub async fn lpop<V>(&self, key: &str) -> Result<Option<V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let element = redis::cmd("LPOP").arg(key).query_async(&mut conn).await?;
        Ok(element)
    }

    /// Pops the tail element of the list at `key` without blocking.
    pub async fn rpop<V>(&self, key: &str) -> Result<Option<V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let element = redis::cmd("RPOP").arg(key).query_async(&mut conn).await?;
        Ok(element)
    }

    /// Pushes `values` onto the head of the list at `key`, creating it when
    /// absent. Elements are inserted one at a time, so the last value ends
    /// up at the head, per server semantics. Returns the new length.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/lpush/>
    pub async fn lpush<V>(&self, key: &str, values: &[V]) -> Result<i64, Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let len = redis::cmd("LPUSH")
            .arg(key)
            .arg(values)
            .query_async(&mut conn)
            .await?;
        Ok(len)
    }

    /// Pushes `values` onto the tail of the list at `key`, creating it when
    /// absent. Returns the new length.
    pub async fn rpush<V>(&self, key: &str, values: &[V]) -> Result<i64, Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let len = redis::cmd("RPUSH")
            .arg(key)
            .arg(values)
            .query_async(&mut conn)
            .await?;
        Ok(len)
    }

    /// Pushes `value` onto the head of the list at `key` only when the list
    /// already exists. Returns the new length, zero when nothing was pushed.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/lpushx/>
    pub async fn lpushx<V>(&self, key: &str, value: V) -> Result<i64, Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let len = redis::cmd("LPUSHX")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(len)
    }

    /// Pushes `value` onto the tail of the list at `key` only when the list
    /// already exists. Returns the new length, zero when nothing was pushed.
    pub async fn rpushx<V>(&self, key: &str, value: V) -> Result<i64, Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let len = redis::cmd("RPUSHX")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(len)
    }

    /// Reads the elements of the list at `key` between offsets `start` and
    /// `stop`, both inclusive. Negative offsets count back from the tail,
    /// so `0, -1` reads the whole list.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/lrange/>
    pub async fn lrange<V>(&self, key: &str, start: i64, stop: i64) -> Result<Vec<V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let elements = redis::cmd("LRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async(&mut conn)
            .await?;
        Ok(elements)
    }

    /// Removes occurrences of `value` from the list at `key`. `count > 0`
    /// removes up to `count` occurrences starting from the head; `count < 0`
    /// removes up to `|count|` starting from the tail; `count = 0` removes
    /// them all. Returns the number of removed elements.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/lrem/>
    pub async fn lrem<V>(&self, key: &str, count: i64, value: V) -> Result<i64, Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let removed = redis::cmd("LREM")
            .arg(key)
            .arg(count)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(removed)
    }

    /// Overwrites the element at `index` of the list at `key`. An
    /// out-of-range index or missing key is a server error.
    pub async fn lset<V>(&self, key: &str, index: i64, value: V) -> Result<(), Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let _: () = redis::cmd("LSET")
            .arg(key)
            .arg(index)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    /// Trims the list at `key` to the elements between offsets `start` and
    /// `stop`, both inclusive, discarding everything outside the range.
    pub async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<(), Error> {
        let mut conn = self.conn().await?;
        let _: () = redis::cmd("LTRIM")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    /// Atomically pops the tail of `source` and pushes it onto the head of
    /// `destination`, without blocking. Returns the rotated element, `None`
    /// when `source` is empty.
    pub async fn rpoplpush<V>(&self, source: &str, destination: &str) -> Result<Option<V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let element = redis::cmd("RPOPLPUSH")
            .arg(source)
            .arg(destination)
            .query_async(&mut conn)
            .await?;
        Ok(element)
    }
}
