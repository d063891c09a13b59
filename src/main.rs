#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    payslip_server::run().await
}
