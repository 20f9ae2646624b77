//! Basic example demonstrating the Telerivet API client.
//!
//! Run with:
//! ```
//! TELERIVET_API_KEY=your-key TELERIVET_PROJECT_ID=PJ... cargo run --example basic
//! ```

use telerivet::{QueryOptions, SortDir, TelerivetClient, TelerivetError};

#[tokio::main]
async fn main() -> telerivet::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let project_id = std::env::var("TELERIVET_PROJECT_ID")
        .map_err(|_| TelerivetError::ConfigMissing("TELERIVET_PROJECT_ID".to_string()))?;

    println!("Creating Telerivet client...");
    let client = TelerivetClient::from_env()?;

    // A reference costs nothing until a field is read
    let mut project = client.init_project_by_id(&project_id);
    println!("Project: {:?}", project.name().await?);

    println!("\n--- Recent Contacts ---");
    let mut contacts = project.query_contacts(
        &QueryOptions::new()
            .sort("time_created")
            .sort_dir(SortDir::Desc),
    )?;
    println!("Total contacts: {}", contacts.count().await?);

    let mut contacts = contacts.limit(10);
    while let Some(mut contact) = contacts.next().await? {
        let name = contact.name().await?.unwrap_or_default();
        let number = contact.phone_number().await?.unwrap_or_default();
        println!("  - {} <{}>", name, number);
    }

    println!("\n--- Incoming Messages ---");
    let messages = project
        .query_messages(&QueryOptions::new().filter("direction", "incoming"))?
        .limit(5)
        .all()
        .await?;

    for mut message in messages {
        let from = message.from_number().await?.unwrap_or_default();
        let content = message.content().await?.unwrap_or_default();
        println!("  {} from {}: {}", message.id().unwrap_or("?"), from, content);
    }

    println!("\nRequests issued: {}", client.num_requests());
    Ok(())
}
