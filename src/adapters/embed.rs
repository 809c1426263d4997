//! Embedding adapter: `TEXT` in, `DENSE` (+ optional sparse pair) out

use crate::api::models::{EmbedRequest, EmbedResponse, FloatMatrix, IntMatrix, TextInput};
use crate::backend::tensor::Tensor;
use crate::error::{AppError, Result};

pub const INPUT_TEXT: &str = "TEXT";
pub const OUTPUT_DENSE: &str = "DENSE";
pub const OUTPUT_SPARSE_VALUES: &str = "SPARSE_VALUES";
pub const OUTPUT_SPARSE_INDICES: &str = "SPARSE_INDICES";

/// Output names to request, in the order the response is decoded
pub fn requested_outputs(sparse: bool) -> Vec<&'static str> {
    if sparse {
        vec![OUTPUT_DENSE, OUTPUT_SPARSE_VALUES, OUTPUT_SPARSE_INDICES]
    } else {
        vec![OUTPUT_DENSE]
    }
}

/// Build the input tensors for one embed call
pub fn build_inputs(request: &EmbedRequest) -> Result<Vec<Tensor>> {
    request.text.validate("text")?;
    Ok(vec![Tensor::bytes(INPUT_TEXT, request.text.to_batch())])
}

/// Decode the output tensors, mirroring the input cardinality
pub fn parse_outputs(request: &EmbedRequest, outputs: &[Tensor]) -> Result<EmbedResponse> {
    let expected = requested_outputs(request.sparse).len();
    if outputs.len() != expected {
        return Err(AppError::MalformedResponse(format!(
            "embed expected {} output tensors, got {}",
            expected,
            outputs.len()
        )));
    }

    // Outputs are positional: DENSE first, then the sparse pair
    let dense = float_matrix(&request.text, &outputs[0])?;

    let (sparse_values, sparse_indices) = if request.sparse {
        let values = float_matrix(&request.text, &outputs[1])?;
        let indices = int_matrix(&request.text, &outputs[2])?;
        (Some(values), Some(indices))
    } else {
        (None, None)
    };

    Ok(EmbedResponse {
        dense,
        sparse_values,
        sparse_indices,
    })
}

fn float_matrix(input: &TextInput, tensor: &Tensor) -> Result<FloatMatrix> {
    if input.is_batch() {
        let rows = tensor.rows_f64()?;
        check_row_count(input, tensor, rows.len())?;
        Ok(FloatMatrix::Batch(rows))
    } else {
        Ok(FloatMatrix::Single(tensor.as_f64_vec()?))
    }
}

// One row per input text, exactly
fn check_row_count(input: &TextInput, tensor: &Tensor, rows: usize) -> Result<()> {
    if rows != input.len() {
        return Err(AppError::MalformedResponse(format!(
            "embed sent {} texts but tensor '{}' carries {} rows",
            input.len(),
            tensor.name,
            rows
        )));
    }
    Ok(())
}

fn int_matrix(input: &TextInput, tensor: &Tensor) -> Result<IntMatrix> {
    if input.is_batch() {
        let flat = tensor.as_i32_vec()?;
        let width = tensor.shape.last().copied().unwrap_or(0).max(0) as usize;
        if width == 0 && flat.is_empty() {
            check_row_count(input, tensor, 0)?;
            return Ok(IntMatrix::Batch(vec![]));
        }
        if width == 0 || flat.len() % width != 0 {
            return Err(AppError::MalformedResponse(format!(
                "tensor '{}' length {} is not divisible by row width {}",
                tensor.name,
                flat.len(),
                width
            )));
        }
        let rows: Vec<Vec<i32>> = flat.chunks(width).map(|row| row.to_vec()).collect();
        check_row_count(input, tensor, rows.len())?;
        Ok(IntMatrix::Batch(rows))
    } else {
        Ok(IntMatrix::Single(tensor.as_i32_vec()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tensor::DataType;
    use serde_json::json;

    fn fp32(name: &str, shape: Vec<i64>, data: Vec<f64>) -> Tensor {
        Tensor {
            name: name.to_string(),
            datatype: DataType::Fp32,
            shape,
            data: data.into_iter().map(|v| json!(v)).collect(),
            parameters: None,
        }
    }

    #[test]
    fn single_text_builds_one_element_tensor() {
        let request = EmbedRequest {
            text: TextInput::Single("Salom dunyo".to_string()),
            sparse: false,
        };
        let inputs = build_inputs(&request).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].name, "TEXT");
        assert_eq!(inputs[0].shape, vec![1]);
    }

    #[test]
    fn batch_builds_n_element_tensor() {
        let request = EmbedRequest {
            text: TextInput::Batch(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
            sparse: false,
        };
        let inputs = build_inputs(&request).unwrap();
        assert_eq!(inputs[0].shape, vec![3]);
        assert_eq!(inputs[0].data.len(), 3);
    }

    #[test]
    fn scalar_input_gives_flat_dense() {
        let request = EmbedRequest {
            text: TextInput::Single("x".to_string()),
            sparse: false,
        };
        let outputs = vec![fp32("DENSE", vec![2], vec![0.1, 0.2])];
        let response = parse_outputs(&request, &outputs).unwrap();
        assert_eq!(response.dense, FloatMatrix::Single(vec![0.1, 0.2]));
        assert!(response.sparse_values.is_none());
    }

    #[test]
    fn batch_input_gives_nested_dense() {
        let request = EmbedRequest {
            text: TextInput::Batch(vec!["x".to_string(), "y".to_string()]),
            sparse: false,
        };
        let outputs = vec![fp32("DENSE", vec![2, 2], vec![0.1, 0.2, 0.3, 0.4])];
        let response = parse_outputs(&request, &outputs).unwrap();
        assert_eq!(
            response.dense,
            FloatMatrix::Batch(vec![vec![0.1, 0.2], vec![0.3, 0.4]])
        );
    }

    #[test]
    fn sparse_request_decodes_all_three_tensors() {
        let request = EmbedRequest {
            text: TextInput::Single("x".to_string()),
            sparse: true,
        };
        let outputs = vec![
            fp32("DENSE", vec![2], vec![0.1, 0.2]),
            fp32("SPARSE_VALUES", vec![2], vec![0.5, 0.25]),
            Tensor {
                name: "SPARSE_INDICES".to_string(),
                datatype: DataType::Int32,
                shape: vec![2],
                data: vec![json!(7), json!(42)],
                parameters: None,
            },
        ];
        let response = parse_outputs(&request, &outputs).unwrap();
        assert_eq!(
            response.sparse_values,
            Some(FloatMatrix::Single(vec![0.5, 0.25]))
        );
        assert_eq!(
            response.sparse_indices,
            Some(IntMatrix::Single(vec![7, 42]))
        );
    }

    #[test]
    fn dense_row_count_mismatch_is_malformed() {
        let request = EmbedRequest {
            text: TextInput::Batch(vec!["x".to_string(), "y".to_string()]),
            sparse: false,
        };
        // Shape/data invariant holds, but three rows came back for two texts
        let outputs = vec![fp32(
            "DENSE",
            vec![3, 2],
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        )];
        assert!(parse_outputs(&request, &outputs).is_err());
    }

    #[test]
    fn sparse_row_count_mismatch_is_malformed() {
        let request = EmbedRequest {
            text: TextInput::Batch(vec!["x".to_string(), "y".to_string()]),
            sparse: true,
        };
        let outputs = vec![
            fp32("DENSE", vec![2, 2], vec![0.1, 0.2, 0.3, 0.4]),
            fp32("SPARSE_VALUES", vec![2, 1], vec![0.5, 0.25]),
            Tensor {
                name: "SPARSE_INDICES".to_string(),
                datatype: DataType::Int32,
                shape: vec![3, 1],
                data: vec![json!(7), json!(42), json!(9)],
                parameters: None,
            },
        ];
        assert!(parse_outputs(&request, &outputs).is_err());
    }

    #[test]
    fn missing_output_tensor_is_malformed() {
        let request = EmbedRequest {
            text: TextInput::Single("x".to_string()),
            sparse: true,
        };
        let outputs = vec![fp32("DENSE", vec![2], vec![0.1, 0.2])];
        assert!(parse_outputs(&request, &outputs).is_err());
    }
}
