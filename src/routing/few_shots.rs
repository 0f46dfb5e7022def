//! Seed examples taught to the classifiers at startup.

/// Complexity examples: LOW requests fit one worker, HIGH ones need a plan.
pub const COMPLEXITY_EXAMPLES: &[(&str, &str)] = &[
    ("hi", "LOW"),
    ("How it's going ?", "LOW"),
    ("What's the weather like today?", "LOW"),
    ("Can you find a file named notes.txt in my Documents folder?", "LOW"),
    ("Write a Python script to generate a random password", "LOW"),
    ("Debug this JavaScript code that's not running properly", "LOW"),
    ("Search the web for the cheapest laptop under $500", "LOW"),
    ("Locate a file called report_2024.pdf on my drive", "LOW"),
    ("Check if a folder named Backups exists on my system", "LOW"),
    ("Write a Python function to check if a string is a palindrome", "LOW"),
    ("Can you search the web for startups in Berlin?", "LOW"),
    ("Create a bash script to list all running processes", "LOW"),
    ("Browse the web to find out who invented Python", "LOW"),
    ("help me organize my desktop files into folders by type.", "LOW"),
    ("make a blackjack in golang", "LOW"),
    ("write a python script to ping a website", "LOW"),
    ("Make a web server in go that serve a simple html page", "LOW"),
    ("Why did it fail?", "LOW"),
    ("make a snake game please", "LOW"),
    ("Use a MCP to find the latest stock market data", "LOW"),
    ("Find the latest research papers on AI and build save in a file", "HIGH"),
    ("Use file.txt and then use it to ...", "HIGH"),
    ("Can you follow the readme and install the project", "HIGH"),
    ("Find a public API for sports scores and build a web app to show live updates", "HIGH"),
    ("Organize my desktop files by extension and then write a script to list them", "HIGH"),
    ("I want you to make me a plan to travel to Tainan", "HIGH"),
    ("can you find vitess repo, clone it and install by following the readme", "HIGH"),
    ("Search the web for the latest trends in web development and build a sample site", "HIGH"),
    ("Create a bash script that monitor the CPU usage and send an email if it's too high", "HIGH"),
    ("Find my resume file, apply to job that might fit online", "HIGH"),
    ("do a deep search of current AI player for 2025 and make me a report in a file", "HIGH"),
    ("Find a file named budget.xlsx, analyze its data, and generate a chart", "HIGH"),
];

/// Capability examples for the learned few-shot classifier.
pub const CAPABILITY_EXAMPLES: &[(&str, &str)] = &[
    ("Write a python script to check if the device on my network is connected to the internet", "code"),
    ("Can you debug this Java code? It's not working.", "code"),
    ("can you make a snake game in python", "code"),
    ("Write a Python function to sort a list of dictionaries by key", "code"),
    ("Create a bash script to monitor CPU usage", "code"),
    ("Debug this C++ code that keeps crashing", "code"),
    ("Write a JavaScript snippet to fetch data from an API", "code"),
    ("Show me how much disk space is left on my drive", "code"),
    ("Hey could you search the web for the latest news on the tesla stock market ?", "web"),
    ("I would like you to search for weather api", "web"),
    ("Find on the web the latest research papers on AI.", "web"),
    ("Can you browse the web and find me a 4090 for cheap?", "web"),
    ("Search online for the best budget smartphones of 2025", "web"),
    ("Look up recent posts on X about climate change", "web"),
    ("What's the weather like today?", "web"),
    ("Search the web for cheap flights to Paris", "web"),
    ("Hey, can you find the old_project.zip file somewhere on my drive?", "files"),
    ("Can you locate the backup folder I created last month on my system?", "files"),
    ("Search my drive for a file called vacation_photos_2023.jpg.", "files"),
    ("Help me organize my desktop files into folders by type.", "files"),
    ("what directory are you in ?", "files"),
    ("Move all .txt files from Downloads to a new folder called Notes", "files"),
    ("Check if budget.xlsx is on my drive", "files"),
    ("can you create a new project called 'new_project'", "files"),
    ("Tell me a funny story", "talk"),
    ("Share a random fun fact about space.", "talk"),
    ("What's your favorite movie and why?", "talk"),
    ("Hey how are you", "talk"),
    ("Hi, how's your day going?", "talk"),
    ("Tell me a quick joke", "talk"),
    ("hi", "talk"),
    ("hello", "talk"),
    ("Can you use MCP to find stock market for IBM ?", "mcp"),
    ("Can you use a MCP to query my calendar and find the next meeting?", "mcp"),
    ("Can you use a mcp to get the distance between Shanghai and Paris?", "mcp"),
];
