//! Refactoring operations and request validation
//!
//! `OperationRequest` is the loose shape accepted from JSON or CLI flags;
//! `RefactoringOperation` is the validated form the analyzer works on.

use crate::error::{OperationError, OperationResult};
use crate::scanner::is_java_identifier;
use serde::{Deserialize, Serialize};

/// Unvalidated refactoring request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationRequest {
    #[serde(rename = "type", alias = "operation")]
    pub operation: String,
    #[serde(alias = "targetFile")]
    pub target_file: Option<String>,
    #[serde(alias = "targetClass")]
    pub target_class: Option<String>,
    #[serde(alias = "targetMethod")]
    pub target_method: Option<String>,
    #[serde(alias = "oldName")]
    pub old_name: Option<String>,
    #[serde(alias = "newName")]
    pub new_name: Option<String>,
    #[serde(alias = "sourceClass")]
    pub source_class: Option<String>,
    #[serde(alias = "extractedClass")]
    pub extracted_class: Option<String>,
}

impl OperationRequest {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Default::default()
        }
    }

    /// Parse a request from JSON text
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// A validated refactoring operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefactoringOperation {
    /// Pull part of `target_method` out into `new_name`
    ExtractMethod {
        target_file: Option<String>,
        target_class: String,
        target_method: String,
        new_name: Option<String>,
    },
    RenameMethod {
        target_file: Option<String>,
        target_class: String,
        old_name: String,
        new_name: String,
    },
    RenameClass {
        target_file: Option<String>,
        old_name: String,
        new_name: String,
    },
    /// Move `target_method` from `source_class` to `target_class`
    MoveMethod {
        target_file: Option<String>,
        source_class: String,
        target_class: String,
        target_method: String,
    },
    ExtractClass {
        target_file: Option<String>,
        source_class: String,
        extracted_class: String,
    },
}

impl RefactoringOperation {
    /// Kebab-case operation name
    pub fn kind(&self) -> &'static str {
        match self {
            RefactoringOperation::ExtractMethod { .. } => "extract-method",
            RefactoringOperation::RenameMethod { .. } => "rename-method",
            RefactoringOperation::RenameClass { .. } => "rename-class",
            RefactoringOperation::MoveMethod { .. } => "move-method",
            RefactoringOperation::ExtractClass { .. } => "extract-class",
        }
    }

    /// The class whose declaring file anchors the change
    pub fn declaring_class(&self) -> &str {
        match self {
            RefactoringOperation::ExtractMethod { target_class, .. }
            | RefactoringOperation::RenameMethod { target_class, .. } => target_class,
            RefactoringOperation::RenameClass { old_name, .. } => old_name,
            RefactoringOperation::MoveMethod { source_class, .. }
            | RefactoringOperation::ExtractClass { source_class, .. } => source_class,
        }
    }

    /// The method the operation is about, for method-level operations
    pub fn method(&self) -> Option<&str> {
        match self {
            RefactoringOperation::ExtractMethod { target_method, .. }
            | RefactoringOperation::MoveMethod { target_method, .. } => Some(target_method),
            RefactoringOperation::RenameMethod { old_name, .. } => Some(old_name),
            RefactoringOperation::RenameClass { .. }
            | RefactoringOperation::ExtractClass { .. } => None,
        }
    }

    /// Name recorded as the element of every dependency the operation finds
    pub fn element(&self) -> &str {
        self.method().unwrap_or_else(|| self.declaring_class())
    }

    pub fn target_file(&self) -> Option<&str> {
        match self {
            RefactoringOperation::ExtractMethod { target_file, .. }
            | RefactoringOperation::RenameMethod { target_file, .. }
            | RefactoringOperation::RenameClass { target_file, .. }
            | RefactoringOperation::MoveMethod { target_file, .. }
            | RefactoringOperation::ExtractClass { target_file, .. } => target_file.as_deref(),
        }
    }
}

/// Canonical operation key: `extract-method`, `ExtractMethod` and
/// `EXTRACT_METHOD` all map to `extractmethod`
fn operation_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn required(
    value: &Option<String>,
    operation: &'static str,
    field: &'static str,
) -> OperationResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(OperationError::MissingField { operation, field }),
    }
}

fn identifier(value: String, field: &'static str) -> OperationResult<String> {
    if is_java_identifier(&value) {
        Ok(value)
    } else {
        Err(OperationError::InvalidIdentifier { field, value })
    }
}

/// Class names may be package-qualified; the simple name is kept
fn class_name(value: String, field: &'static str) -> OperationResult<String> {
    if value.split('.').all(is_java_identifier) {
        let simple = value.rsplit('.').next().unwrap_or(&value).to_string();
        Ok(simple)
    } else {
        Err(OperationError::InvalidIdentifier { field, value })
    }
}

fn renamed(
    old: &str,
    new: String,
    operation: &'static str,
    field: &'static str,
) -> OperationResult<String> {
    if new == old {
        Err(OperationError::UnchangedName {
            operation,
            field,
            value: new,
        })
    } else {
        Ok(new)
    }
}

fn optional_file(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.replace('\\', "/"))
}

impl TryFrom<&OperationRequest> for RefactoringOperation {
    type Error = OperationError;

    fn try_from(req: &OperationRequest) -> OperationResult<Self> {
        let target_file = optional_file(&req.target_file);
        match operation_key(&req.operation).as_str() {
            "extractmethod" => {
                const OP: &str = "extract-method";
                let new_name = match &req.new_name {
                    Some(n) if !n.trim().is_empty() => {
                        Some(identifier(n.trim().to_string(), "new_name")?)
                    }
                    _ => None,
                };
                let class = required(&req.target_class, OP, "target_class")?;
                let method = required(&req.target_method, OP, "target_method")?;
                Ok(RefactoringOperation::ExtractMethod {
                    target_file,
                    target_class: class_name(class, "target_class")?,
                    target_method: identifier(method, "target_method")?,
                    new_name,
                })
            }
            "renamemethod" => {
                const OP: &str = "rename-method";
                // `target_method` names the method when `old_name` is absent
                let old = req.old_name.clone().or_else(|| req.target_method.clone());
                let old_name = identifier(required(&old, OP, "old_name")?, "old_name")?;
                let new_name = identifier(required(&req.new_name, OP, "new_name")?, "new_name")?;
                let class = required(&req.target_class, OP, "target_class")?;
                Ok(RefactoringOperation::RenameMethod {
                    target_file,
                    target_class: class_name(class, "target_class")?,
                    new_name: renamed(&old_name, new_name, OP, "new_name")?,
                    old_name,
                })
            }
            "renameclass" => {
                const OP: &str = "rename-class";
                let old = req.old_name.clone().or_else(|| req.target_class.clone());
                let old_name = class_name(required(&old, OP, "old_name")?, "old_name")?;
                let new_name = identifier(required(&req.new_name, OP, "new_name")?, "new_name")?;
                Ok(RefactoringOperation::RenameClass {
                    target_file,
                    new_name: renamed(&old_name, new_name, OP, "new_name")?,
                    old_name,
                })
            }
            "movemethod" => {
                const OP: &str = "move-method";
                let source = required(&req.source_class, OP, "source_class")?;
                let target = required(&req.target_class, OP, "target_class")?;
                let method = required(&req.target_method, OP, "target_method")?;
                Ok(RefactoringOperation::MoveMethod {
                    target_file,
                    source_class: class_name(source, "source_class")?,
                    target_class: class_name(target, "target_class")?,
                    target_method: identifier(method, "target_method")?,
                })
            }
            "extractclass" => {
                const OP: &str = "extract-class";
                let source = required(&req.source_class, OP, "source_class")?;
                let source_class = class_name(source, "source_class")?;
                let extracted = required(&req.extracted_class, OP, "extracted_class")?;
                let extracted = identifier(extracted, "extracted_class")?;
                Ok(RefactoringOperation::ExtractClass {
                    target_file,
                    extracted_class: renamed(&source_class, extracted, OP, "extracted_class")?,
                    source_class,
                })
            }
            _ => Err(OperationError::UnknownOperation(req.operation.clone())),
        }
    }
}

impl TryFrom<OperationRequest> for RefactoringOperation {
    type Error = OperationError;

    fn try_from(req: OperationRequest) -> OperationResult<Self> {
        RefactoringOperation::try_from(&req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(op: &str) -> OperationRequest {
        OperationRequest::new(op)
    }

    #[test]
    fn test_rename_class_from_json() {
        let req = OperationRequest::from_json(
            r#"{"type": "RENAME_CLASS", "oldName": "Foo", "newName": "Bar"}"#,
        )
        .expect("json");
        let op = RefactoringOperation::try_from(&req).expect("valid");
        assert_eq!(
            op,
            RefactoringOperation::RenameClass {
                target_file: None,
                old_name: "Foo".into(),
                new_name: "Bar".into(),
            }
        );
        assert_eq!(op.kind(), "rename-class");
        assert_eq!(op.declaring_class(), "Foo");
        assert_eq!(op.element(), "Foo");
    }

    #[test]
    fn test_operation_names_are_normalized() {
        for name in ["extract-class", "ExtractClass", "EXTRACT_CLASS", "extract_class"] {
            let mut req = request(name);
            req.source_class = Some("com.shop.Order".into());
            req.extracted_class = Some("OrderLines".into());
            let op = RefactoringOperation::try_from(&req).expect("valid");
            assert_eq!(op.declaring_class(), "Order");
        }
    }

    #[test]
    fn test_unknown_operation() {
        let err = RefactoringOperation::try_from(&request("inline-everything")).unwrap_err();
        assert_eq!(err, OperationError::UnknownOperation("inline-everything".into()));
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        let mut req = request("rename-method");
        req.target_class = Some("Service".into());
        req.old_name = Some("run".into());
        assert_eq!(
            RefactoringOperation::try_from(&req).unwrap_err(),
            OperationError::MissingField {
                operation: "rename-method",
                field: "new_name"
            }
        );

        req.new_name = Some("2run".into());
        assert!(matches!(
            RefactoringOperation::try_from(&req),
            Err(OperationError::InvalidIdentifier { field: "new_name", .. })
        ));

        req.new_name = Some("run".into());
        assert!(matches!(
            RefactoringOperation::try_from(&req),
            Err(OperationError::UnchangedName { .. })
        ));

        req.new_name = Some("execute".into());
        let op = RefactoringOperation::try_from(&req).expect("valid");
        assert_eq!(op.method(), Some("run"));
        assert_eq!(op.element(), "run");
    }

    #[test]
    fn test_move_method_requires_all_parts() {
        let mut req = request("move-method");
        req.source_class = Some("Order".into());
        req.target_method = Some("total".into());
        assert_eq!(
            RefactoringOperation::try_from(&req).unwrap_err(),
            OperationError::MissingField {
                operation: "move-method",
                field: "target_class"
            }
        );
        req.target_class = Some("Invoice".into());
        req.target_file = Some("src\\Order.java".into());
        let op = RefactoringOperation::try_from(req).expect("valid");
        assert_eq!(op.target_file(), Some("src/Order.java"));
        assert_eq!(op.declaring_class(), "Order");
    }

    #[test]
    fn test_validated_operation_serializes_with_type_tag() {
        let op = RefactoringOperation::ExtractMethod {
            target_file: None,
            target_class: "A".into(),
            target_method: "run".into(),
            new_name: None,
        };
        let json = serde_json::to_value(&op).expect("json");
        assert_eq!(json["type"], "EXTRACT_METHOD");
        assert_eq!(json["target_method"], "run");
    }
}
