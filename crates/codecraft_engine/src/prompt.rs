use crate::{SiteRequest, StyleChoice};

/// Build the instruction prompt sent to the model as a single user message.
///
/// The directives about output shape matter more than the style text: the
/// extractor depends on the response starting with a real document and
/// carrying no explanations or markdown.
pub fn build_prompt(request: &SiteRequest) -> String {
    let file_instruction = match request.style {
        StyleChoice::NoCss => {
            "Create only HTML and JavaScript code and put it all into one HTML file. \
             Do not include any CSS."
        }
        StyleChoice::Simple | StyleChoice::Colorful => {
            "Create the HTML, CSS and JavaScript code and put it all into one HTML file."
        }
    };
    let style_instruction = match request.style {
        StyleChoice::NoCss => {
            "Do not use any CSS styling, focus only on functionality. \
             Keep it simple and fast to generate."
        }
        StyleChoice::Simple => {
            "Use modern CSS for styling and make it visually appealing with a clean, \
             professional design and gentle animations."
        }
        StyleChoice::Colorful => {
            "Use vibrant colors, gradients, animations and interactive elements. \
             Make the design colorful, playful and dynamic."
        }
    };

    let mut prompt = format!(
        "Generate HTML code for a site that: {description}.\n\
         {file_instruction}\n\
         Make sure the code is complete, functional, and well-designed.\n\
         Start the response with <!DOCTYPE html> and include a proper HTML structure. \
         DO NOT explain anything, start with the code.\n\
         {style_instruction}\n\
         Do not include any explanations or markdown formatting in the response, \
         just output the raw HTML code.",
        description = request.prompt.trim(),
    );
    if request.style != StyleChoice::NoCss {
        prompt.push_str("\nInclude responsive design so it works on mobile devices too.");
    }
    prompt
}
