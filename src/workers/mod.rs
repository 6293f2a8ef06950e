pub mod ensure_schema;
