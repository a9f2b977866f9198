pub mod upload_client;
