//! Serves a small site from a `Mux`.
//!
//! Try:
//!   curl http://127.0.0.1:8080/
//!   curl http://127.0.0.1:8080/hello/ferris
//!   curl http://127.0.0.1:8080/assets/css/site.css
//!   curl -X PUT http://127.0.0.1:8080/echo/anything

use microroute::{HttpServer, Mux, ServerConfig, StatusCode, StatusError};
use serde::Serialize;

#[derive(Serialize)]
struct Greeting<'a> {
    name: &'a str,
    message: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut mux = Mux::new();

    mux.set_error_handler(|res, _req, err| {
        res.set_status(err.status());
        res.set_header("Content-Type", "text/plain");
        let message = match err.message() {
            "" => err.status().reason_phrase(),
            friendly => friendly,
        };
        res.write_str(message);
    });

    mux.set_not_found(|res, req| {
        res.set_status(StatusCode::NotFound);
        res.set_header("Content-Type", "text/html");
        res.write_str(&format!("<h1>Nothing at {}</h1>", req.route_path()));
    });

    mux.get("/", |res, _req| {
        res.set_header("Content-Type", "text/html");
        res.write_str("<html><body><h1>Welcome to microroute!</h1></body></html>");
        Ok(())
    });

    mux.get("/hello/{name}", |res, req| {
        let name = req.param("name");
        let greeting = Greeting {
            name,
            message: format!("Hello, {name}!"),
        };
        res.write_json(&greeting)
            .map_err(|e| StatusError::with_cause(StatusCode::InternalServerError, e))
    });

    mux.get("/assets/", |res, req| {
        res.set_header("Content-Type", "text/plain");
        res.write_str(&format!("would serve {}", req.route_path()));
        Ok(())
    });

    mux.get("/admin", |_res, _req| {
        Err(StatusError::new(StatusCode::Forbidden).with_friendly("Admins only"))
    });

    mux.any("/echo...", Mux::wrap(|res, req| {
        res.write_str(&format!("{} {}", req.method, req.path));
    }));

    let server = HttpServer::new(ServerConfig::default(), mux);
    server.start().await?;

    Ok(())
}
