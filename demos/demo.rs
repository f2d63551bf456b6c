use dfquery::*;

fn main() -> Result<()> {
    println!("dfquery demo\n");

    let mut scope = Scope::new();
    let users = scope.bind(
        "users",
        Table::from_columns(vec![
            Column::from_values("id", [1, 2, 3]),
            Column::from_values("name", ["Alice", "Bob", "Charlie"]),
            Column::from_values("age", [Value::Int(30), Value::Null, Value::Int(25)]),
        ])
        .map_err(Error::Table)?,
    );
    let teams = scope.bind(
        "teams",
        Table::from_columns(vec![
            Column::from_values("user_id", [1, 3]),
            Column::from_values("team", ["storage", "query"]),
        ])
        .map_err(Error::Table)?,
    );

    let client = TableQuery::new(&scope);
    println!("Backing store: {}\n", client.store_path().display());

    let adults = client.read(&users, "SELECT name, age FROM users WHERE age >= 18", &[])?;
    print_table("Adults", &adults);

    let joined = client.read(
        &users,
        "SELECT users.name, teams.team FROM users JOIN teams ON users.id = teams.user_id",
        &[&teams],
    )?;
    print_table("Teams", &joined);

    let aged = client.update(&users, "UPDATE users SET age = 40 WHERE age IS NULL", &[])?;
    print_table("After update", &aged);

    client.execute("CREATE TABLE notes (id INTEGER, note TEXT)")?;
    println!("Created table 'notes' in the backing store");

    client.close()?;
    println!("Backing store removed");
    Ok(())
}

fn print_table(title: &str, table: &Table) {
    println!("{title}:");
    let header: Vec<String> = table
        .column_names()
        .iter()
        .map(|name| format!("{name:<10}"))
        .collect();
    println!("{}", header.join(" "));
    println!("{}", "-".repeat(11 * header.len()));
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:<10}", v.to_string())).collect();
        println!("{}", cells.join(" "));
    }
    println!();
}
