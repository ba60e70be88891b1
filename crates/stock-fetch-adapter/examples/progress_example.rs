/*
[INPUT]:  Fetch service base URL and stock codes from the command line
[OUTPUT]: Raw progress events for one submitted task
[POS]:    Examples - submit a task and follow its progress channel
[UPDATE]: When the query or progress API changes
*/

use stock_fetch_adapter::*;

/// Example: submit one fetch task and print every progress event
///
/// Usage: cargo run --example progress_example -- http://127.0.0.1:8000 600519.SH,000001.SZ
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let base_url = args.next().unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let codes = args.next().unwrap_or_else(|| "600519.SH".to_string());

    let client = FetchClient::with_config(&base_url, ClientConfig::default())?;
    let accepted = client
        .start_query(&QueryRequest {
            codes,
            start_date: None,
            end_date: None,
            years: 3,
        })
        .await?;
    println!("task {} accepted: {}", accepted.task_id, accepted.message);

    let mut socket = ProgressSocket::connect(client.progress_url(&accepted.task_id)?);
    let mut events = socket
        .take_receiver()
        .ok_or("progress receiver already taken")?;

    while let Some(event) = events.recv().await {
        match event {
            ChannelEvent::Message(ProgressMessage::Log { text }) => println!("{text}"),
            ChannelEvent::Message(ProgressMessage::Status { progress, total }) => {
                println!("progress {progress}/{total}")
            }
            ChannelEvent::Message(message) if message.is_terminal() => {
                println!("finished: {message:?}");
                break;
            }
            ChannelEvent::Message(_) => {}
            ChannelEvent::Error(detail) => {
                println!("connection error: {detail}");
                break;
            }
            ChannelEvent::Closed => break,
        }
    }

    socket.close();
    Ok(())
}
