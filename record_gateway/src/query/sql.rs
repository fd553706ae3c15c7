//! Query construction
//!
//! SQL fragment and statement generation with numbered placeholders.

use crate::query::conditions::{Conditions, Op, Predicate};
use crate::query::ordering::OrderBy;
use crate::validation::{ValidatedFieldName, ValidatedTableName};
use serde_json::Value;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build a WHERE clause from conditions
    ///
    /// Returns the clause including the WHERE keyword (or an empty string)
    /// and the parameter values in placeholder order.
    pub fn build_where_clause(conditions: &Conditions) -> (String, Vec<Value>) {
        if conditions.is_empty() {
            return ("".to_string(), Vec::new());
        }

        let mut values = Vec::new();
        let mut param_counter = 1;

        let predicates_sql = conditions
            .predicates()
            .iter()
            .map(|predicate| Self::build_predicate_sql(predicate, &mut values, &mut param_counter))
            .collect::<Vec<_>>()
            .join(" AND ");

        (format!("WHERE {}", predicates_sql), values)
    }

    fn build_predicate_sql(
        predicate: &Predicate,
        values: &mut Vec<Value>,
        param_counter: &mut i32,
    ) -> String {
        let column = predicate.column.as_str();

        match &predicate.op {
            Op::Eq => {
                if predicate.value.is_some() {
                    Self::comparison_sql(column, "=", &predicate.value, values, param_counter)
                } else {
                    format!("{} IS NULL", column)
                }
            }
            Op::Ne => {
                if predicate.value.is_some() {
                    Self::comparison_sql(column, "!=", &predicate.value, values, param_counter)
                } else {
                    format!("{} IS NOT NULL", column)
                }
            }
            Op::Gt => Self::comparison_sql(column, ">", &predicate.value, values, param_counter),
            Op::Gte => Self::comparison_sql(column, ">=", &predicate.value, values, param_counter),
            Op::Lt => Self::comparison_sql(column, "<", &predicate.value, values, param_counter),
            Op::Lte => Self::comparison_sql(column, "<=", &predicate.value, values, param_counter),
            Op::Like => Self::comparison_sql(column, "LIKE", &predicate.value, values, param_counter),
            Op::ILike => {
                Self::comparison_sql(column, "ILIKE", &predicate.value, values, param_counter)
            }
            Op::In => {
                if let Some(Value::Array(members)) = &predicate.value {
                    if members.is_empty() {
                        return "1=0".to_string(); // Empty IN matches nothing
                    }

                    let placeholders: Vec<String> = members
                        .iter()
                        .map(|_| {
                            let param = format!("${}", param_counter);
                            *param_counter += 1;
                            param
                        })
                        .collect();

                    values.extend(members.clone());
                    format!("{} IN ({})", column, placeholders.join(", "))
                } else {
                    "1=0".to_string()
                }
            }
            Op::NotIn => {
                if let Some(Value::Array(members)) = &predicate.value {
                    if members.is_empty() {
                        return "1=1".to_string(); // Empty NOT IN excludes nothing
                    }

                    let placeholders: Vec<String> = members
                        .iter()
                        .map(|_| {
                            let param = format!("${}", param_counter);
                            *param_counter += 1;
                            param
                        })
                        .collect();

                    values.extend(members.clone());
                    format!("{} NOT IN ({})", column, placeholders.join(", "))
                } else {
                    "1=1".to_string()
                }
            }
            Op::IsNull => format!("{} IS NULL", column),
            Op::IsNotNull => format!("{} IS NOT NULL", column),
        }
    }

    fn comparison_sql(
        column: &str,
        operator: &str,
        value: &Option<Value>,
        values: &mut Vec<Value>,
        param_counter: &mut i32,
    ) -> String {
        if let Some(value) = value {
            values.push(value.clone());
            let param = format!("${}", param_counter);
            *param_counter += 1;
            format!("{} {} {}", column, operator, param)
        } else {
            "1=0".to_string() // Comparison without a value can never hold
        }
    }

    /// Build an ORDER BY clause
    pub fn build_order_clause(order_by: &OrderBy) -> String {
        if order_by.is_empty() {
            return "".to_string();
        }

        let order_items: Vec<String> = order_by
            .columns()
            .iter()
            .map(|(column, order)| format!("{} {}", column.as_str(), order.to_sql()))
            .collect();

        format!("ORDER BY {}", order_items.join(", "))
    }

    /// Build a LIMIT/OFFSET clause
    pub fn build_limit_clause(limit: Option<i64>, offset: Option<i64>) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        if let Some(offset) = offset {
            clauses.push(format!("OFFSET {}", offset));
        }

        clauses.join(" ")
    }

    /// Build an INSERT statement that returns the generated key
    pub fn build_insert(
        table: &ValidatedTableName,
        primary_key: &ValidatedFieldName,
        columns: &[(ValidatedFieldName, Value)],
    ) -> (String, Vec<Value>) {
        let names: Vec<&str> = columns.iter().map(|(name, _)| name.as_str()).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
        let values: Vec<Value> = columns.iter().map(|(_, value)| value.clone()).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table.as_str(),
            names.join(", "),
            placeholders.join(", "),
            primary_key.as_str()
        );

        (sql, values)
    }

    /// Build an UPDATE statement keyed on the primary key column
    pub fn build_update_by_id(
        table: &ValidatedTableName,
        primary_key: &ValidatedFieldName,
        columns: &[(ValidatedFieldName, Value)],
        id: &Value,
    ) -> (String, Vec<Value>) {
        let mut assignments = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len() + 1);
        let mut param_counter = 1;

        for (name, value) in columns {
            assignments.push(format!("{} = ${}", name.as_str(), param_counter));
            values.push(value.clone());
            param_counter += 1;
        }
        values.push(id.clone());

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ${}",
            table.as_str(),
            assignments.join(", "),
            primary_key.as_str(),
            param_counter
        );

        (sql, values)
    }

    /// Build a DELETE statement keyed on the primary key column
    pub fn build_delete_by_id(
        table: &ValidatedTableName,
        primary_key: &ValidatedFieldName,
        id: &Value,
    ) -> (String, Vec<Value>) {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1",
            table.as_str(),
            primary_key.as_str()
        );

        (sql, vec![id.clone()])
    }
}
