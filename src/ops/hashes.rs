use redis::{FromRedisValue, ToRedisArgs};
use std::collections::HashMap;

use crate::facade::Facade;
use crate::Error;

impl Facade {
    /// Removes the given fields from the hash at `key`, ignoring fields that
    /// do not exist. Returns the number of fields actually removed.
    pub async fn hdel(&self, key: &str, fields: &[&str]) -> Result<i64, Error> {
        let mut conn = self.conn().await?;
        let removed = redis::cmd("HDEL")
            .arg(key)
            .arg(fields)
            .query_async(&mut conn)
            .await?;
        Ok(removed)
    }

    /// Returns whether `field` exists in the hash at `key`.
    pub async fn hexists(&self, key: &str, field: &str) -> Result<bool, Error> {
        let mut conn = self.conn().await?;
        let exists = redis::cmd("HEXISTS")
            .arg(key)
            .arg(field)
            .query_async(&mut conn)
            .await?;
        Ok(exists)
    }

    /// Reads one field of the hash at `key`. `None` when the key or the
    /// field does not exist.
    pub async fn hget<V>(&self, key: &str, field: &str) -> Result<Option<V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let value = redis::cmd("HGET")
            .arg(key)
            .arg(field)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    /// Reads every field and value of the hash at `key`. A missing key reads
    /// as an empty map.
    pub async fn hget_all<V>(&self, key: &str) -> Result<HashMap<String, V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let entries = redis::cmd("HGETALL").arg(key).query_async(&mut conn).await?;
        Ok(entries)
    }

    /// Increments the integer stored in `field` of the hash at `key` by
    /// `increment` (which may be negative). An absent key or field is
    /// initialized to zero first; a non-integer value is a server error.
    ///
    /// Ref: <https://redis.io/docs/latest/commands/hincrby/>
    pub async fn hincr_by(&self, key: &str, field: &str, increment: i64) -> Result<i64, Error> {
        let mut conn = self.conn().await?;
        let value = redis::cmd("HINCRBY")
            .arg(key)
            .arg(field)
            .arg(increment)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    /// Increments the float stored in `field` of the hash at `key`,
    /// initializing an absent key or field to zero first.
    pub async fn hincr_by_float(
        &self,
        key: &str,
        field: &str,
        increment: f64,
    ) -> Result<f64, Error> {
        let mut conn = self.conn().await?;
        let value = redis::cmd("HINCRBYFLOAT")
            .arg(key)
            .arg(field)
            .arg(increment)
            .query_async(&mut conn)
            .await?;
        Ok(value)
    }

    /// Returns the field names of the hash at `key`.
    pub async fn hkeys(&self, key: &str) -> Result<Vec<String>, Error> {
        let mut conn = self.conn().await?;
        let fields = redis::cmd("HKEYS").arg(key).query_async(&mut conn).await?;
        Ok(fields)
    }

    /// Returns the number of fields in the hash at `key`, zero for a
    /// missing key.
    pub async fn hlen(&self, key: &str) -> Result<i64, Error> {
        let mut conn = self.conn().await?;
        let len = redis::cmd("HLEN").arg(key).query_async(&mut conn).await?;
        Ok(len)
    }

    /// Reads several fields of the hash at `key` in one round trip. The
    /// result has one entry per requested field, in request order, with
    /// `None` for fields that do not exist.
    pub async fn hmget<V>(&self, key: &str, fields: &[&str]) -> Result<Vec<Option<V>>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let values = redis::cmd("HMGET")
            .arg(key)
            .arg(fields)
            .query_async(&mut conn)
            .await?;
        Ok(values)
    }

    /// Writes several field-value pairs into the hash at `key` in one round
    /// trip, overwriting existing fields.
    pub async fn hset_multiple<V>(&self, key: &str, items: &[(&str, V)]) -> Result<(), Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let _: () = redis::cmd("HSET")
            .arg(key)
            .arg(items)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    /// Sets `field` of the hash at `key` to `value`, creating the hash when
    /// `key` does not exist.
    pub async fn hset<V>(&self, key: &str, field: &str, value: V) -> Result<(), Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let _: () = redis::cmd("HSET")
            .arg(key)
            .arg(field)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    /// Sets `field` of the hash at `key` only when the field does not
    /// already exist. Returns whether the write happened.
    pub async fn hset_nx<V>(&self, key: &str, field: &str, value: V) -> Result<bool, Error>
    where
        V: ToRedisArgs,
    {
        let mut conn = self.conn().await?;
        let written = redis::cmd("HSETNX")
            .arg(key)
            .arg(field)
            .arg(value)
            .query_async(&mut conn)
            .await?;
        Ok(written)
    }

    /// Returns every value of the hash at `key`.
    pub async fn hvals<V>(&self, key: &str) -> Result<Vec<V>, Error>
    where
        V: FromRedisValue,
    {
        let mut conn = self.conn().await?;
        let values = redis::cmd("HVALS").arg(key).query_async(&mut conn).await?;
        Ok(values)
    }

    /// Returns the byte length of the value stored in `field` of the hash at
    /// `key`, zero when the key or field does not exist.
    pub async fn hstrlen(&self, key: &str, field: &str) -> Result<i64, Error> {
        let mut conn = self.conn().await?;
        let len = redis::cmd("HSTRLEN")
            .arg(key)
            .arg(field)
            .query_async(&mut conn)
            .await?;
        Ok(len)
    }
}
