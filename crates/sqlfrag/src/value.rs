//! Bound argument values.
//!
//! [`Value`] is what ends up in a built statement's argument list. It is a
//! closed set of scalar kinds decided at construction, so rendering never has
//! to inspect foreign type metadata. It also implements tokio-postgres'
//! [`ToSql`], which lets a built statement's arguments be handed straight to a
//! `tokio_postgres` call.

use bytes::BytesMut;
use chrono::{DateTime, Utc};
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A single bound argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Uuid(uuid::Uuid),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Whether this value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Wrap raw bytes (`bytea`).
    pub fn bytes(v: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(v.into())
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Text,
    serde_json::Value => Json,
    uuid::Uuid => Uuid,
    DateTime<Utc> => Timestamp,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => {
                if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql_checked(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*v)?.to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::Float(v) => {
                if *ty == Type::FLOAT4 {
                    narrow_f32(*v)?.to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => v.to_sql_checked(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <bool as ToSql>::accepts(ty)
            || <i16 as ToSql>::accepts(ty)
            || <i32 as ToSql>::accepts(ty)
            || <i64 as ToSql>::accepts(ty)
            || <f32 as ToSql>::accepts(ty)
            || <f64 as ToSql>::accepts(ty)
            || <String as ToSql>::accepts(ty)
            || <Vec<u8> as ToSql>::accepts(ty)
            || <serde_json::Value as ToSql>::accepts(ty)
            || <uuid::Uuid as ToSql>::accepts(ty)
            || <DateTime<Utc> as ToSql>::accepts(ty)
    }

    // NULL binds to any parameter type; every other variant is checked
    // against the parameter type by its own encoder.
    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        self.to_sql(ty, out)
    }
}

fn narrow_f32(v: f64) -> Result<f32, Box<dyn Error + Sync + Send>> {
    if v.is_finite() && v.abs() > f64::from(f32::MAX) {
        return Err(format!("value {v} out of range for FLOAT4").into());
    }
    Ok(v as f32)
}
