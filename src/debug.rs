extern crate pretty_bytes;
extern crate querystring;
extern crate std;
extern crate tiny_http;

fn html_header() -> tiny_http::Header {
    return tiny_http::Header::from_bytes(
        &b"Content-Type"[..], &b"text/html; charset=utf-8"[..]).expect("header");
}

pub fn run_debug_server(port: u16, local_png: Option<String>) {
    let server = match tiny_http::Server::http(("0.0.0.0", port)) {
        Ok(server) => server,
        Err(err) => {
            error!("Could not start debug HTTP server on port {}: {}", port, err);
            return;
        },
    };

    info!("Running debug HTTP server on port {}", port);
    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let (path, query) = match url.find('?') {
            Some(index) => (&url[..index], &url[index + 1..]),
            None => (url.as_str(), ""),
        };

        let served = match path {
            "/" => main_page(request, local_png.is_some()),
            "/current_image" => current_image(request, local_png.as_deref()),
            "/dumplog" => dump_log(request, query),
            _ => request.respond(
                tiny_http::Response::from_string("<h1>404</h1><p>Not found!<p>")
                    .with_status_code(404)
                    .with_header(html_header())),
        };
        if let Err(err) = served {
            warn!("Debug server response failed: {}", err);
        }
    }
}

fn which_log(query: &str) -> Option<String> {
    for (k, v) in querystring::querify(query) {
        if k == "log" && v.ends_with(".log") {
            return Some(v.to_string());
        }
    }
    return None;
}

fn current_image(request: tiny_http::Request, local_png: Option<&str>) -> std::io::Result<()> {
    let bytes = match local_png.and_then(|path| std::fs::read(path).ok()) {
        Some(bytes) => bytes,
        None => {
            return request.respond(
                tiny_http::Response::from_string("no image").with_status_code(404));
        },
    };
    return request.respond(tiny_http::Response::from_data(bytes).with_header(
        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"image/png"[..])
            .expect("header")));
}

fn dump_log(request: tiny_http::Request, query: &str) -> std::io::Result<()> {
    let contents = which_log(query)
        .and_then(|filename| std::fs::read_to_string(filename).ok());
    match contents {
        Some(contents) => {
            return request.respond(tiny_http::Response::from_string(contents));
        },
        None => {
            return request.respond(
                tiny_http::Response::from_string("no such log").with_status_code(404));
        },
    }
}

fn main_page(request: tiny_http::Request, has_local_png: bool) -> std::io::Result<()> {
    let mut body = format!(
        "<html><body><h1>Railsign Debug Server</h1><div>Version {}</div>",
        env!("CARGO_PKG_VERSION"));

    if has_local_png {
        body.push_str("<div><h2>Current frame</h2><img style='border: 1px solid black;' src='/current_image' /></div>");
    }

    body.push_str("<div><h2>Log files</h2><ul>");
    if let Ok(entries) = std::fs::read_dir("./") {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.to_string_lossy().ends_with(".log") {
                if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                    let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                    body.push_str(&format!(
                        "<li><a href='/dumplog?log={}'>{}</a> [{}]</li>",
                        filename, filename,
                        pretty_bytes::converter::convert(size as f64)));
                }
            }
        }
    }
    body.push_str("</ul></div>");
    body.push_str("</body></html>");

    return request.respond(
        tiny_http::Response::from_string(body).with_header(html_header()));
}
