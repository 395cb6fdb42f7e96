// Archivo: command.rs
// Propósito: `Command`, la petición externa (con nombre y parámetros) para
// cambiar el estado de un documento.
use crate::errors::CommandError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// Petición inmutable de transición: un nombre (`"VERIFY"`, `"PUBLISH"`...)
/// y una bolsa de parámetros específica de cada transición.
///
/// Se construye con `Command::new(..).with_param(..)`; una vez construido
/// sólo expone lectores tipados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    name: String,
    #[serde(default)]
    params: Map<String, JsonValue>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), params: Map::new() }
    }

    /// Construye un comando a partir de un objeto JSON ya decodificado.
    pub fn with_params(name: impl Into<String>, params: Map<String, JsonValue>) -> Self {
        Self { name: name.into(), params }
    }

    /// Añade un parámetro consumiendo el comando (builder).
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Map<String, JsonValue> {
        &self.params
    }

    pub fn has_param(&self, key: &str) -> bool {
        self.params.get(key).is_some_and(|v| !v.is_null())
    }

    fn raw(&self, key: &str) -> Result<&JsonValue, CommandError> {
        match self.params.get(key) {
            Some(v) if !v.is_null() => Ok(v),
            _ => Err(CommandError::MissingParam { command: self.name.clone(), key: key.to_string() }),
        }
    }

    fn invalid(&self, key: &str, expected: &str) -> CommandError {
        CommandError::InvalidParam { command: self.name.clone(), key: key.to_string(), expected: expected.to_string() }
    }

    pub fn get_i64(&self, key: &str) -> Result<i64, CommandError> {
        self.raw(key)?.as_i64().ok_or_else(|| self.invalid(key, "i64"))
    }

    pub fn get_str(&self, key: &str) -> Result<&str, CommandError> {
        self.raw(key)?.as_str().ok_or_else(|| self.invalid(key, "string"))
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, CommandError> {
        self.raw(key)?.as_bool().ok_or_else(|| self.invalid(key, "bool"))
    }

    pub fn get_uuid(&self, key: &str) -> Result<Uuid, CommandError> {
        let s = self.get_str(key).map_err(|e| match e {
                                     CommandError::InvalidParam { .. } => self.invalid(key, "uuid"),
                                     other => other,
                                 })?;
        Uuid::parse_str(s).map_err(|_| self.invalid(key, "uuid"))
    }

    /// Lector genérico: deserializa el parámetro en `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, CommandError> {
        let v = self.raw(key)?;
        serde_json::from_value(v.clone()).map_err(|_| self.invalid(key, std::any::type_name::<T>()))
    }

    /// Como `get_i64`, pero `None` si el parámetro no viene.
    pub fn opt_i64(&self, key: &str) -> Result<Option<i64>, CommandError> {
        if !self.has_param(key) {
            return Ok(None);
        }
        self.get_i64(key).map(Some)
    }
}
