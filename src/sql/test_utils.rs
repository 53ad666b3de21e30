//! Parser-backed checks for emitted SQL, used by unit tests.

use sqlparser::dialect::{
    DuckDbDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect,
};
use sqlparser::parser::Parser;

use super::dialect::Dialect;

fn parser_dialect(dialect: Dialect) -> Box<dyn sqlparser::dialect::Dialect> {
    match dialect {
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::DuckDb => Box::new(DuckDbDialect {}),
        Dialect::MySql => Box::new(MySqlDialect {}),
        Dialect::Sqlite => Box::new(SQLiteDialect {}),
        Dialect::TSql => Box::new(MsSqlDialect {}),
    }
}

/// Number of statements `sql` parses into for the target engine.
pub fn parse_count(sql: &str, dialect: Dialect) -> Result<usize, String> {
    Parser::parse_sql(&*parser_dialect(dialect), sql)
        .map(|statements| statements.len())
        .map_err(|e| format!("{dialect:?} rejected `{sql}`: {e}"))
}

/// Panics unless `sql` is exactly one statement the engine's parser accepts.
#[track_caller]
pub fn assert_valid_sql(sql: &str, dialect: Dialect) {
    match parse_count(sql, dialect) {
        Ok(1) => {}
        Ok(n) => panic!("expected one statement, parsed {n}: `{sql}`"),
        Err(e) => panic!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoting_styles_parse() {
        assert_valid_sql("SELECT \"id\" FROM \"users\" WHERE \"id\" = $1", Dialect::Postgres);
        assert_valid_sql("SELECT `id` FROM `users` WHERE `id` = ?", Dialect::MySql);
        assert_valid_sql("SELECT \"id\" FROM \"users\" WHERE \"id\" = :id", Dialect::Sqlite);
        assert_valid_sql("SELECT [id] FROM [users] WHERE [id] = @id", Dialect::TSql);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_count("SELEC * FORM users", Dialect::DuckDb).is_err());
        assert_eq!(parse_count("SELECT 1; SELECT 2", Dialect::Postgres), Ok(2));
    }
}
