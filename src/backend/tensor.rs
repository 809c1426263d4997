//! Triton v2 (KServe) named-tensor wire model
//!
//! Requests and responses carry flat `data` arrays; the declared shape must
//! always multiply out to the data length.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Tensor element type tag as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    Bytes,
    Fp32,
    Int32,
    Int64,
}

/// Optional per-tensor parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TensorParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A named, typed, shaped tensor with a flat data payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor {
    pub name: String,
    pub datatype: DataType,
    pub shape: Vec<i64>,
    pub data: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<TensorParameters>,
}

impl Tensor {
    /// Byte-string input tensor of shape `[n]` with string content marking
    pub fn bytes(name: &str, values: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            datatype: DataType::Bytes,
            shape: vec![values.len() as i64],
            data: values.into_iter().map(Value::String).collect(),
            parameters: Some(TensorParameters {
                content_type: Some("str".to_string()),
            }),
        }
    }

    /// Number of elements the declared shape describes
    pub fn element_count(&self) -> usize {
        self.shape.iter().product::<i64>().max(0) as usize
    }

    /// Verify the data length matches the declared shape
    pub fn check_shape(&self) -> Result<()> {
        if self.data.len() != self.element_count() {
            return Err(AppError::MalformedResponse(format!(
                "tensor '{}' declares shape {:?} ({} elements) but carries {} values",
                self.name,
                self.shape,
                self.element_count(),
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Decode the payload as a flat float vector
    pub fn as_f64_vec(&self) -> Result<Vec<f64>> {
        self.data
            .iter()
            .map(|v| {
                v.as_f64().ok_or_else(|| {
                    AppError::MalformedResponse(format!(
                        "tensor '{}' contains non-numeric value {v}",
                        self.name
                    ))
                })
            })
            .collect()
    }

    /// Decode the payload as a flat i32 vector
    pub fn as_i32_vec(&self) -> Result<Vec<i32>> {
        self.data
            .iter()
            .map(|v| {
                let wide = v.as_i64().ok_or_else(|| {
                    AppError::MalformedResponse(format!(
                        "tensor '{}' contains non-integer value {v}",
                        self.name
                    ))
                })?;
                i32::try_from(wide).map_err(|_| {
                    AppError::MalformedResponse(format!(
                        "tensor '{}' value {wide} does not fit in INT32",
                        self.name
                    ))
                })
            })
            .collect()
    }

    /// Decode the payload as float rows, using the trailing shape
    /// dimension as the row width
    pub fn rows_f64(&self) -> Result<Vec<Vec<f64>>> {
        let flat = self.as_f64_vec()?;
        let width = self.shape.last().copied().unwrap_or(0).max(0) as usize;
        if width == 0 {
            if flat.is_empty() {
                return Ok(vec![]);
            }
            return Err(AppError::MalformedResponse(format!(
                "tensor '{}' has a zero trailing dimension but {} values",
                self.name,
                flat.len()
            )));
        }
        if flat.len() % width != 0 {
            return Err(AppError::MalformedResponse(format!(
                "tensor '{}' length {} is not divisible by row width {}",
                self.name,
                flat.len(),
                width
            )));
        }
        Ok(flat.chunks(width).map(|row| row.to_vec()).collect())
    }

    /// Decode the payload as text.
    ///
    /// Contract: each element is base64-decoded first; the decoded bytes are
    /// used when they are valid UTF-8, otherwise the element is taken as
    /// literal text.
    pub fn as_text_vec(&self) -> Result<Vec<String>> {
        self.data
            .iter()
            .map(|v| {
                let raw = v.as_str().ok_or_else(|| {
                    AppError::MalformedResponse(format!(
                        "tensor '{}' contains a non-string value {v}",
                        self.name
                    ))
                })?;
                Ok(decode_byte_string(raw))
            })
            .collect()
    }
}

fn decode_byte_string(raw: &str) -> String {
    match BASE64.decode(raw) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => raw.to_string(),
        },
        Err(_) => raw.to_string(),
    }
}

/// Requested output, by name only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputRequest {
    pub name: String,
}

impl OutputRequest {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// One inference call: input tensors plus the outputs wanted back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub inputs: Vec<Tensor>,
    pub outputs: Vec<OutputRequest>,
}

/// Backend answer. Output tensors are ordered positionally against the
/// requested output names; callers index, they do not search by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    #[serde(default)]
    pub outputs: Vec<Tensor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bytes_tensor_carries_shape_and_content_type() {
        let t = Tensor::bytes("TEXT", vec!["a".to_string(), "b".to_string()]);
        assert_eq!(t.shape, vec![2]);
        assert_eq!(t.datatype, DataType::Bytes);
        assert_eq!(
            t.parameters.unwrap().content_type.as_deref(),
            Some("str")
        );
        assert_eq!(t.data, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let t = Tensor {
            name: "DENSE".to_string(),
            datatype: DataType::Fp32,
            shape: vec![2, 3],
            data: vec![json!(0.1); 5],
            parameters: None,
        };
        assert!(t.check_shape().is_err());
    }

    #[test]
    fn wire_serialization_matches_v2_schema() {
        let t = Tensor::bytes("QUERY", vec!["hi".to_string()]);
        let wire = serde_json::to_value(&t).unwrap();
        assert_eq!(
            wire,
            json!({
                "name": "QUERY",
                "datatype": "BYTES",
                "shape": [1],
                "data": ["hi"],
                "parameters": {"content_type": "str"}
            })
        );
    }

    #[test]
    fn rows_split_by_trailing_dimension() {
        let t = Tensor {
            name: "DENSE".to_string(),
            datatype: DataType::Fp32,
            shape: vec![2, 2],
            data: vec![json!(0.1), json!(0.2), json!(0.3), json!(0.4)],
            parameters: None,
        };
        let rows = t.rows_f64().unwrap();
        assert_eq!(rows, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
    }

    #[test]
    fn text_decoding_prefers_base64() {
        let t = Tensor {
            name: "TRANSLATION".to_string(),
            // "salom" in base64, plus a literal that is not valid base64
            datatype: DataType::Bytes,
            shape: vec![2],
            data: vec![json!("c2Fsb20="), json!("plain text!")],
            parameters: None,
        };
        let texts = t.as_text_vec().unwrap();
        assert_eq!(texts, vec!["salom".to_string(), "plain text!".to_string()]);
    }

    #[test]
    fn out_of_range_int32_is_malformed() {
        let t = Tensor {
            name: "SPARSE_INDICES".to_string(),
            datatype: DataType::Int32,
            shape: vec![2],
            data: vec![json!(7), json!(i64::from(i32::MAX) + 1)],
            parameters: None,
        };
        assert!(t.as_i32_vec().is_err());
    }

    #[test]
    fn non_numeric_dense_data_is_malformed() {
        let t = Tensor {
            name: "DENSE".to_string(),
            datatype: DataType::Fp32,
            shape: vec![1],
            data: vec![json!("oops")],
            parameters: None,
        };
        assert!(t.as_f64_vec().is_err());
    }
}
