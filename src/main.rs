#[actix_web::main]
async fn main() {
    if let Err(e) = orgchart_admin::run().await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
